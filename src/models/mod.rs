pub mod habit;
pub mod mood;
pub mod note;
pub mod plan;
pub mod profile;
pub mod task;
pub mod user;

use serde::Deserialize;

/// Query params shared by the mood/habit history endpoints.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

impl HistoryQuery {
    /// Latest-N window; the original client showed two weeks by default.
    pub fn limit_or_default(&self) -> i64 {
        self.limit.unwrap_or(14).clamp(1, 90)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_limit_defaults_and_clamps() {
        assert_eq!(HistoryQuery { limit: None }.limit_or_default(), 14);
        assert_eq!(HistoryQuery { limit: Some(30) }.limit_or_default(), 30);
        assert_eq!(HistoryQuery { limit: Some(0) }.limit_or_default(), 1);
        assert_eq!(HistoryQuery { limit: Some(500) }.limit_or_default(), 90);
    }
}
