use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prompts::{self, OPTIONS_PER_PLAYER};
use crate::{CompletionRequest, ContentGenerator, Error};

const CREATIVE_TEMPERATURE: f32 = 0.9;

/// One of the options offered to a player, as shown to the judge.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionCandidate {
    pub id: i32,
    pub text: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessVerdict {
    pub matched_option_id: Option<i32>,
    pub reasoning: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TeamNameEntry {
    pub player_name: String,
    pub suggestion: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamNameVerdict {
    pub winner_name: String,
    #[serde(default)]
    pub reasoning: String,
}

/// What the award writer gets to know about one player.
#[derive(Clone, Debug, PartialEq)]
pub struct FunAwardSubject {
    pub name: String,
    pub tell: Option<String>,
    pub mission: Option<String>,
    pub guesses_made: usize,
    pub correct_guesses: usize,
    pub wrong_guesses_against: usize,
    pub mission_completions: usize,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FunAward {
    pub name: String,
    pub award: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Deserialize)]
struct FunAwardList {
    awards: Vec<FunAward>,
}

/// Reads a list of option texts out of a completion.
///
/// The model is asked for `{ "<key>": [...] }` but does not always comply, so
/// this falls back to an `options` key and then to the first array found.
pub fn parse_option_list(value: &Value, key: &str) -> Result<Vec<String>, Error> {
    let list = value
        .get(key)
        .or_else(|| value.get("options"))
        .filter(|v| v.is_array())
        .or_else(|| {
            value
                .as_object()
                .and_then(|object| object.values().find(|v| v.is_array()))
        })
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Parse(format!("expected a list of {}", key)))?;

    let options: Vec<String> = list
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .take(OPTIONS_PER_PLAYER)
        .map(String::from)
        .collect();

    if options.is_empty() {
        return Err(Error::Parse(format!("no {} in response", key)));
    }

    Ok(options)
}

pub async fn generate_tell_options(
    generator: &dyn ContentGenerator,
    player_name: &str,
    existing: &[String],
) -> Result<Vec<String>, Error> {
    let request = CompletionRequest::new(prompts::tell_options(player_name, existing))
        .with_temperature(CREATIVE_TEMPERATURE);
    let value = generator.complete_json(request).await?;
    parse_option_list(&value, "tells")
}

pub async fn generate_mission_options(
    generator: &dyn ContentGenerator,
    player_name: &str,
    existing: &[String],
) -> Result<Vec<String>, Error> {
    let request = CompletionRequest::new(prompts::mission_options(player_name, existing))
        .with_temperature(CREATIVE_TEMPERATURE);
    let value = generator.complete_json(request).await?;
    parse_option_list(&value, "missions")
}

pub async fn generate_tell_image(
    generator: &dyn ContentGenerator,
    tell_text: &str,
) -> Result<String, Error> {
    generator.generate_image(&prompts::tell_image(tell_text)).await
}

pub async fn generate_mission_image(
    generator: &dyn ContentGenerator,
    mission_text: &str,
) -> Result<String, Error> {
    generator
        .generate_image(&prompts::mission_image(mission_text))
        .await
}

/// Asks the model which of the target's options a free-text guess describes.
///
/// A matched id that is not one of `options` is discarded.
pub async fn judge_guess(
    generator: &dyn ContentGenerator,
    target_name: &str,
    guess_text: &str,
    options: &[OptionCandidate],
) -> Result<GuessVerdict, Error> {
    let request = CompletionRequest::new(prompts::judge_guess(target_name, guess_text, options));
    let value = generator.complete_json(request).await?;
    let mut verdict: GuessVerdict =
        serde_json::from_value(value).map_err(|e| Error::Parse(e.to_string()))?;

    if let Some(id) = verdict.matched_option_id {
        if !options.iter().any(|option| option.id == id) {
            warn!("judge matched unknown option {} for {}", id, target_name);
            verdict.matched_option_id = None;
        }
    }

    Ok(verdict)
}

pub async fn judge_team_names(
    generator: &dyn ContentGenerator,
    team: i32,
    entries: &[TeamNameEntry],
) -> Result<TeamNameVerdict, Error> {
    let request = CompletionRequest::new(prompts::judge_team_names(team, entries));
    let value = generator.complete_json(request).await?;
    serde_json::from_value(value).map_err(|e| Error::Parse(e.to_string()))
}

pub async fn generate_fun_awards(
    generator: &dyn ContentGenerator,
    subjects: &[FunAwardSubject],
) -> Result<Vec<FunAward>, Error> {
    let request = CompletionRequest::new(prompts::fun_awards(subjects))
        .with_temperature(CREATIVE_TEMPERATURE);
    let value = generator.complete_json(request).await?;
    let list: FunAwardList =
        serde_json::from_value(value).map_err(|e| Error::Parse(e.to_string()))?;
    Ok(list.awards)
}
