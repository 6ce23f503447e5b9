use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// The struct used for storing data on the disk. Field names are the wire format:
/// the persisted file is a JSON array of these objects, and data files written by
/// earlier versions of the app must keep loading unchanged.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct RecordEntity {
    /// Creation instant in Unix milliseconds. Doubles as the record identifier.
    pub id: i64,
    /// Self-care hours.
    pub autocuidado: f64,
    /// Gratitude moments.
    pub gratidao: i64,
    /// Social interactions.
    pub interacoes: i64,
    /// Water intake. Read by the water ordering but never written by any creation
    /// or edit path. Absent from serialized output when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agua: Option<f64>,
}

impl RecordEntity {
    /// Moment the record was created, recovered from its id. `None` for ids
    /// outside the representable range.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.id)
    }

    /// Full-field replacement used when an edit is submitted. The identity and
    /// the water value survive, everything the form captures is overwritten.
    pub fn replace_metrics(&mut self, autocuidado: f64, gratidao: i64, interacoes: i64) {
        self.autocuidado = autocuidado;
        self.gratidao = gratidao;
        self.interacoes = interacoes;
    }
}
