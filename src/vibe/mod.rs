//! AI DJ quote adapter
//!
//! Flavor text for the in-game DJ panel, fetched from the Gemini
//! generateContent endpoint. Requests are fire-and-forget: the shell kicks
//! one off on boot, run start, crash, and occasionally mid-drive, and the
//! panel shows whatever the newest request produced. Without an API key the
//! DJ degrades to canned offline text and never touches the network.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visual treatment for the DJ panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Neon,
    Static,
    Glitch,
}

impl Mood {
    /// CSS class the HUD applies to the quote text
    pub fn css_class(self) -> &'static str {
        match self {
            Mood::Neon => "mood-neon",
            Mood::Static => "mood-static",
            Mood::Glitch => "mood-glitch",
        }
    }
}

/// What prompted a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteContext {
    /// A run is starting (also the boot greeting)
    Start,
    /// The player just crashed
    Crash,
    /// Mid-run color commentary
    Driving,
}

impl QuoteContext {
    fn prompt(self) -> &'static str {
        match self {
            QuoteContext::Start => {
                "Give a welcoming, hype quote about starting an endless drive into the digital horizon."
            }
            QuoteContext::Crash => {
                "Give a melancholic but encouraging quote about crashing and trying again in the simulation."
            }
            QuoteContext::Driving => {
                "Give a short, deep philosophical thought about speed and neon lights."
            }
        }
    }
}

/// A quote plus how to present it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiVibe {
    pub quote: String,
    pub mood: Mood,
}

impl AiVibe {
    /// Panel content before the first response lands
    pub fn initializing() -> Self {
        Self {
            quote: "I N I T I A L I Z I N G . . .".to_string(),
            mood: Mood::Neon,
        }
    }

    /// No API key: the DJ stays off the air
    pub fn offline() -> Self {
        Self {
            quote: "S Y S T E M   O F F L I N E".to_string(),
            mood: Mood::Static,
        }
    }

    /// A request failed after it went out
    pub fn reconnecting() -> Self {
        Self {
            quote: "R E C O N N E C T I N G . . .".to_string(),
            mood: Mood::Glitch,
        }
    }

    /// The response came back without usable text
    pub fn empty_feed() -> Self {
        Self {
            quote: "Loading simulation data...".to_string(),
            mood: Mood::Neon,
        }
    }
}

/// Quote adapter failures
#[derive(Debug, Error)]
pub enum VibeError {
    #[error("no API key configured")]
    MissingKey,
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Map a failure to what the panel should show instead
pub fn fallback_for(error: &VibeError) -> AiVibe {
    match error {
        VibeError::MissingKey => AiVibe::offline(),
        _ => AiVibe::reconnecting(),
    }
}

/// API key baked in at build time. Empty counts as absent.
pub fn api_key() -> Option<&'static str> {
    option_env!("GEMINI_API_KEY").filter(|key| !key.is_empty())
}

const MODEL: &str = "gemini-2.5-flash";

const SYSTEM_INSTRUCTION: &str = "You are the \"Neon DJ\", a disembodied AI voice living in a vaporwave simulation from 1989. \nYour tone is nostalgic, philosophical, calm, and slightly glitchy.\nYou talk about: eternity, digital sunsets, grid lines, endless drives, and the beauty of low-poly geometry.\nKeep responses short (under 20 words).";

fn endpoint() -> String {
    format!("https://generativelanguage.googleapis.com/v1beta/models/{MODEL}:generateContent")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteRequest<'a> {
    system_instruction: RequestContent<'a>,
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

fn request_body(context: QuoteContext) -> Result<String, VibeError> {
    let request = QuoteRequest {
        system_instruction: RequestContent {
            parts: [RequestPart {
                text: SYSTEM_INSTRUCTION,
            }],
        },
        contents: [RequestContent {
            parts: [RequestPart {
                text: context.prompt(),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: 0.8,
            max_output_tokens: 50,
            thinking_config: ThinkingConfig { thinking_budget: 0 },
        },
    };
    Ok(serde_json::to_string(&request)?)
}

#[derive(Debug, Default, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Pull the first candidate's text out of a response body. Whitespace-only
/// text counts as empty and falls back to the canned feed line; anything
/// real comes through with the neon mood.
fn parse_response(body: &str) -> Result<AiVibe, VibeError> {
    let response: QuoteResponse = serde_json::from_str(body)?;
    let text = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .map(|p| p.text.trim())
        .unwrap_or("");
    if text.is_empty() {
        return Ok(AiVibe::empty_feed());
    }
    Ok(AiVibe {
        quote: text.to_string(),
        mood: Mood::Neon,
    })
}

/// Latest-wins holder for the DJ panel
///
/// Every request takes a numbered ticket; a response only lands if it still
/// holds the newest number. Slow replies from an earlier trigger are dropped
/// instead of overwriting fresher text.
#[derive(Debug)]
pub struct QuotePanel {
    current: AiVibe,
    loading: bool,
    generation: u64,
}

impl QuotePanel {
    pub fn new() -> Self {
        Self {
            current: AiVibe::initializing(),
            loading: false,
            generation: 0,
        }
    }

    /// Register a new in-flight request and take its ticket
    pub fn begin_request(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Land a response. Returns false (and changes nothing) when a newer
    /// request has been issued since this ticket was taken.
    pub fn apply(&mut self, generation: u64, vibe: AiVibe) -> bool {
        if generation != self.generation {
            log::debug!(
                "dropping stale quote response (ticket {generation}, current {})",
                self.generation
            );
            return false;
        }
        self.current = vibe;
        self.loading = false;
        true
    }

    /// Replace the panel directly, invalidating any request in flight
    pub fn show(&mut self, vibe: AiVibe) {
        self.generation += 1;
        self.current = vibe;
        self.loading = false;
    }

    pub fn current(&self) -> &AiVibe {
        &self.current
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

impl Default for QuotePanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
pub mod fetch {
    //! Browser-side request plumbing

    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::{
        AiVibe, QuoteContext, VibeError, api_key, endpoint, parse_response, request_body,
    };

    /// POST one prompt to the generateContent endpoint and parse the reply.
    /// No retries, no timeout: the caller's ticket decides whether a slow
    /// reply still matters by the time it lands.
    pub async fn fetch_vibe(context: QuoteContext) -> Result<AiVibe, VibeError> {
        let key = api_key().ok_or(VibeError::MissingKey)?;
        let body = request_body(context)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(&endpoint(), &opts).map_err(js_err)?;
        let headers = request.headers();
        headers
            .set("Content-Type", "application/json")
            .map_err(js_err)?;
        headers.set("x-goog-api-key", key).map_err(js_err)?;

        let window = web_sys::window().ok_or_else(|| VibeError::Network("no window".into()))?;
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_err)?;
        let response: Response = response.dyn_into().map_err(js_err)?;
        if !response.ok() {
            return Err(VibeError::Status(response.status()));
        }

        let text = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        parse_response(&text.as_string().unwrap_or_default())
    }

    fn js_err(err: JsValue) -> VibeError {
        VibeError::Network(format!("{err:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let body = request_body(QuoteContext::Start).unwrap();
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();

        let persona = v["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(persona.contains("Neon DJ"));
        assert!(persona.contains("under 20 words"));

        assert_eq!(
            v["contents"][0]["parts"][0]["text"].as_str().unwrap(),
            "Give a welcoming, hype quote about starting an endless drive into the digital horizon."
        );

        let config = &v["generationConfig"];
        assert!((config["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
        assert_eq!(config["maxOutputTokens"].as_u64().unwrap(), 50);
        assert_eq!(config["thinkingConfig"]["thinkingBudget"].as_u64().unwrap(), 0);
    }

    #[test]
    fn test_each_context_gets_its_own_prompt() {
        let start = request_body(QuoteContext::Start).unwrap();
        let crash = request_body(QuoteContext::Crash).unwrap();
        let driving = request_body(QuoteContext::Driving).unwrap();
        assert!(crash.contains("crashing and trying again"));
        assert!(driving.contains("speed and neon lights"));
        assert_ne!(start, crash);
        assert_ne!(crash, driving);
    }

    #[test]
    fn test_parse_extracts_and_trims() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  Stay chrome, driver.  \n"}]}}]}"#;
        let vibe = parse_response(body).unwrap();
        assert_eq!(vibe.quote, "Stay chrome, driver.");
        assert_eq!(vibe.mood, Mood::Neon);
    }

    #[test]
    fn test_parse_empty_candidates_falls_back() {
        let vibe = parse_response(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(vibe, AiVibe::empty_feed());

        let vibe = parse_response("{}").unwrap();
        assert_eq!(vibe, AiVibe::empty_feed());
    }

    #[test]
    fn test_parse_whitespace_text_falls_back() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"   \n  "}]}}]}"#;
        let vibe = parse_response(body).unwrap();
        assert_eq!(vibe, AiVibe::empty_feed());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let result = parse_response("not json");
        assert!(matches!(result, Err(VibeError::Decode(_))));
    }

    #[test]
    fn test_fallback_mapping() {
        assert_eq!(fallback_for(&VibeError::MissingKey), AiVibe::offline());
        assert_eq!(
            fallback_for(&VibeError::Network("down".into())),
            AiVibe::reconnecting()
        );
        assert_eq!(fallback_for(&VibeError::Status(429)), AiVibe::reconnecting());
    }

    #[test]
    fn test_panel_starts_initializing() {
        let panel = QuotePanel::new();
        assert_eq!(panel.current(), &AiVibe::initializing());
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_panel_drops_stale_responses() {
        let mut panel = QuotePanel::new();
        let first = panel.begin_request();
        let second = panel.begin_request();

        // The older ticket lost the race and must not land
        assert!(!panel.apply(
            first,
            AiVibe {
                quote: "old".into(),
                mood: Mood::Neon
            }
        ));
        assert!(panel.is_loading());

        assert!(panel.apply(
            second,
            AiVibe {
                quote: "new".into(),
                mood: Mood::Neon
            }
        ));
        assert_eq!(panel.current().quote, "new");
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_panel_show_invalidates_in_flight() {
        let mut panel = QuotePanel::new();
        let ticket = panel.begin_request();
        panel.show(AiVibe::offline());

        assert!(!panel.apply(
            ticket,
            AiVibe {
                quote: "late".into(),
                mood: Mood::Neon
            }
        ));
        assert_eq!(panel.current(), &AiVibe::offline());
        assert!(!panel.is_loading());
    }
}
