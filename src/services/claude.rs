use anyhow::Context;

use crate::config::Config;

/// Send a single prompt to the Claude Messages API and return the text of
/// the first content block. One shot, 30-second timeout, no retries; the
/// caller decides whether a failure is fatal (planning) or degrades
/// (sentiment).
pub async fn complete(config: &Config, max_tokens: u32, prompt: &str) -> anyhow::Result<String> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let response = client
        .post("https://api.anthropic.com/v1/messages")
        .header("x-api-key", &config.claude_api_key)
        .header("anthropic-version", "2023-06-01")
        .header("content-type", "application/json")
        .json(&serde_json::json!({
            "model": config.claude_model,
            "max_tokens": max_tokens,
            "messages": [{
                "role": "user",
                "content": prompt
            }]
        }))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Claude API error {}: {}", status, body);
    }

    let body: serde_json::Value = response.json().await?;
    let text = body["content"][0]["text"]
        .as_str()
        .context("Claude response had no text content")?;

    Ok(text.to_string())
}
