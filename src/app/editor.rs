use std::io::Write;

use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::storage::entities::RecordEntity;

/// The three coerced values a completed form emits. Whether they create a new
/// record or replace an existing one is decided by the caller, the form itself
/// never knows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordDraft {
    pub autocuidado: f64,
    pub gratidao: i64,
    pub interacoes: i64,
}

#[derive(Debug, PartialEq)]
pub enum FormOutcome {
    Submitted(RecordDraft),
    Cancelled,
}

/// Form controller for a single record. Constructed empty for a new entry or
/// prefilled with the record selected for editing.
pub struct RecordForm {
    prefill: Option<RecordEntity>,
}

impl RecordForm {
    pub fn new() -> Self {
        Self { prefill: None }
    }

    pub fn editing(record: RecordEntity) -> Self {
        Self {
            prefill: Some(record),
        }
    }

    /// Coerces the three raw text inputs into a draft.
    pub fn submit(&self, autocuidado: &str, gratidao: &str, interacoes: &str) -> Result<RecordDraft> {
        Ok(RecordDraft {
            autocuidado: parse_hours(autocuidado)?,
            gratidao: parse_count(gratidao)?,
            interacoes: parse_count(interacoes)?,
        })
    }

    /// Runs the prompt sequence against `input`. End of input or a lone `q`
    /// cancels without emitting values. An empty answer keeps the prefilled
    /// value when editing and cancels when creating, since there is no value to
    /// fall back on.
    pub async fn run_interactive<R>(&self, input: &mut R) -> Result<FormOutcome>
    where
        R: AsyncBufRead + Unpin,
    {
        let autocuidado = match prompt(input, "Self-care hours", self.prefill_text(|p| p.autocuidado.to_string())).await? {
            Answer::Cancelled => return Ok(FormOutcome::Cancelled),
            Answer::Empty => match &self.prefill {
                Some(prefill) => prefill.autocuidado,
                None => return Ok(FormOutcome::Cancelled),
            },
            Answer::Text(raw) => parse_hours(&raw)?,
        };

        let gratidao = match prompt(input, "Gratitude moments", self.prefill_text(|p| p.gratidao.to_string())).await? {
            Answer::Cancelled => return Ok(FormOutcome::Cancelled),
            Answer::Empty => match &self.prefill {
                Some(prefill) => prefill.gratidao,
                None => return Ok(FormOutcome::Cancelled),
            },
            Answer::Text(raw) => parse_count(&raw)?,
        };

        let interacoes = match prompt(input, "Social interactions", self.prefill_text(|p| p.interacoes.to_string())).await? {
            Answer::Cancelled => return Ok(FormOutcome::Cancelled),
            Answer::Empty => match &self.prefill {
                Some(prefill) => prefill.interacoes,
                None => return Ok(FormOutcome::Cancelled),
            },
            Answer::Text(raw) => parse_count(&raw)?,
        };

        Ok(FormOutcome::Submitted(RecordDraft {
            autocuidado,
            gratidao,
            interacoes,
        }))
    }

    fn prefill_text(&self, extract: impl Fn(&RecordEntity) -> String) -> Option<String> {
        self.prefill.as_ref().map(extract)
    }
}

enum Answer {
    Text(String),
    Empty,
    Cancelled,
}

async fn prompt<R>(input: &mut R, label: &str, current: Option<String>) -> Result<Answer>
where
    R: AsyncBufRead + Unpin,
{
    match &current {
        Some(current) => print!("{label} [{current}]: "),
        None => print!("{label}: "),
    }
    std::io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(Answer::Cancelled);
    }
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        return Ok(Answer::Cancelled);
    }
    if line.is_empty() {
        return Ok(Answer::Empty);
    }
    Ok(Answer::Text(line.to_string()))
}

/// Coerces a self-care value. The form always accepted both `7,5` and `7.5`, so
/// a comma is normalized to a dot before the parse, and trailing garbage after
/// the number is dropped rather than rejected.
pub fn parse_hours(raw: &str) -> Result<f64> {
    let normalized = raw.trim().replace(',', ".");
    numeric_prefix(&normalized, true)
        .parse::<f64>()
        .map_err(|_| anyhow!("Can't read {raw:?} as hours"))
}

/// Coerces a count with base-10 parsing of the leading integer prefix.
pub fn parse_count(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    numeric_prefix(trimmed, false)
        .parse::<i64>()
        .map_err(|_| anyhow!("Can't read {raw:?} as a count"))
}

fn numeric_prefix(value: &str, decimal: bool) -> &str {
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in value.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '.' if decimal && !seen_dot => seen_dot = true,
            c if c.is_ascii_digit() => {}
            _ => break,
        }
        end = i + c.len_utf8();
    }
    &value[..end]
}
