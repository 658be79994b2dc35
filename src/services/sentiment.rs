use crate::config::Config;
use crate::services::claude;

/// Score used whenever analysis fails; note creation never blocks on it.
const NEUTRAL_SCORE: i32 = 5;

/// Score the sentiment of a journal entry from 1 (very negative) to 10
/// (very positive). Every failure path degrades to the neutral default.
pub async fn analyze(config: &Config, content: &str) -> i32 {
    let prompt = format!(
        r#"Analyze the sentiment of the following journal entry. Return a score from 1 (very negative) to 10 (very positive). Return ONLY JSON: {{"score": 5}}

{content}"#
    );

    match claude::complete(config, 128, &prompt).await {
        Ok(text) => parse_score(&text).unwrap_or_else(|| {
            tracing::warn!("Sentiment response unparsable, using neutral default");
            NEUTRAL_SCORE
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Sentiment analysis unavailable, using neutral default");
            NEUTRAL_SCORE
        }
    }
}

fn parse_score(text: &str) -> Option<i32> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let score = value.get("score")?.as_i64()?;
    Some(score.clamp(1, 10) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_score() {
        assert_eq!(parse_score(r#"{"score": 7}"#), Some(7));
    }

    #[test]
    fn clamps_out_of_range_scores() {
        assert_eq!(parse_score(r#"{"score": 42}"#), Some(10));
        assert_eq!(parse_score(r#"{"score": -3}"#), Some(1));
    }

    #[test]
    fn garbage_yields_none() {
        assert_eq!(parse_score("definitely not json"), None);
        assert_eq!(parse_score(r#"{"sentiment": "positive"}"#), None);
        assert_eq!(parse_score(r#"{"score": "high"}"#), None);
    }
}
