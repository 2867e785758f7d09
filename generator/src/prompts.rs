use crate::{FunAwardSubject, OptionCandidate, TeamNameEntry};

/// How many already-used options are listed when asking for fresh ones.
pub const EXISTING_OPTIONS_LIMIT: usize = 20;

pub const OPTIONS_PER_PLAYER: usize = 3;

fn existing_list(existing: &[String]) -> String {
    if existing.is_empty() {
        return "(none yet)".to_string();
    }
    existing
        .iter()
        .take(EXISTING_OPTIONS_LIMIT)
        .map(String::as_str)
        .collect::<Vec<&str>>()
        .join("; ")
}

pub fn tell_options(player_name: &str, existing: &[String]) -> String {
    format!(
        r#"You are helping run a family party game called "Secret Agents".

A "tell" is a small behaviour a player repeats all day whenever a particular trigger happens. For example:
- Touch your ear whenever someone says "dinner"
- Blink three times when someone laughs
- Clear your throat when someone mentions food
- Scratch your nose when someone says your name

Write {count} different, fun and achievable secret tells for {player_name}.

Rules:
- Subtle enough that nobody notices straight away
- Can be repeated many times during a family gathering
- Family-friendly and safe for every age
- Each one names the trigger and the action
- Slightly challenging, never exhausting
- Must differ from these tells already in use: {existing}

Answer with a JSON object in exactly this shape: {{ "tells": ["tell 1", "tell 2", "tell 3"] }}"#,
        count = OPTIONS_PER_PLAYER,
        player_name = player_name,
        existing = existing_list(existing),
    )
}

pub fn mission_options(player_name: &str, existing: &[String]) -> String {
    format!(
        r#"You are helping run a family party game called "Secret Agents".

A "mission" is a small task where a player gets another family member to do something without them realising it was planned. For example:
- Get someone to offer you a drink without asking for one
- Get someone to sing a line from a song
- Get someone to tell a story from their childhood
- Get someone to compliment your outfit

Write {count} different secret missions for {player_name}.

Rules:
- Always involves at least one other person
- The other person should not realise they are part of a mission
- Not so easy it can be done ten times in a day
- Not so hard it cannot be done two or three times during a gathering
- An attentive person could notice something is going on
- Family-friendly and fun
- Must differ from these missions already in use: {existing}

Answer with a JSON object in exactly this shape: {{ "missions": ["mission 1", "mission 2", "mission 3"] }}"#,
        count = OPTIONS_PER_PLAYER,
        player_name = player_name,
        existing = existing_list(existing),
    )
}

pub fn tell_image(tell_text: &str) -> String {
    format!(
        "A simple, cute illustration of this secret behaviour: \"{}\". \
         Warm, cartoon-like, cosy party feel, suitable for all ages. \
         No text in the image. Clear, simple imagery.",
        tell_text
    )
}

pub fn mission_image(mission_text: &str) -> String {
    format!(
        "A simple, cute illustration hinting at this secret mission: \"{}\". \
         Warm, cartoon-like, cosy party feel, suitable for all ages. \
         No text in the image. Clear, simple imagery.",
        mission_text
    )
}

pub fn judge_guess(target_name: &str, guess_text: &str, options: &[OptionCandidate]) -> String {
    let listed = options
        .iter()
        .map(|option| format!("- id {}: \"{}\"", option.id, option.text))
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        r#"You are the fair judge of a family party game.

{target_name} was offered these secret tells:
{listed}

Another player watched {target_name} and guessed their tell was:
"{guess_text}"

Decide which offered tell, if any, the guess describes. Be generous with wording and spelling but strict about the behaviour and the trigger: a guess that names a different action, or is too vague to tell the options apart, matches nothing.

Answer with a JSON object in exactly this shape:
{{ "matchedOptionId": <the id of the matching tell, or null>, "reasoning": "<one or two friendly sentences>" }}"#,
        target_name = target_name,
        listed = listed,
        guess_text = guess_text,
    )
}

pub fn judge_team_names(team: i32, entries: &[TeamNameEntry]) -> String {
    let listed = entries
        .iter()
        .map(|entry| format!("- \"{}\" (by {})", entry.suggestion, entry.player_name))
        .collect::<Vec<String>>()
        .join("\n");
    let names = entries
        .iter()
        .map(|entry| entry.player_name.as_str())
        .collect::<Vec<&str>>()
        .join(" or ");

    format!(
        r#"You are a fun, fair judge for a family party game.

Team {team} has these team name suggestions:
{listed}

Pick the BEST team name, judging creativity, how fun and memorable it is, and any clever wordplay.

Answer with a JSON object in exactly this shape:
{{ "winnerName": "<exact name of the winner: {names}>", "reasoning": "<a light-hearted one or two sentence explanation>" }}"#,
        team = team,
        listed = listed,
        names = names,
    )
}

pub fn fun_awards(subjects: &[FunAwardSubject]) -> String {
    let listed = subjects
        .iter()
        .map(|s| {
            format!(
                "- {}: tell \"{}\", mission \"{}\", made {} guesses ({} correct), {} wrong guesses about them, {} mission completions",
                s.name,
                s.tell.as_deref().unwrap_or("none"),
                s.mission.as_deref().unwrap_or("none"),
                s.guesses_made,
                s.correct_guesses,
                s.wrong_guesses_against,
                s.mission_completions,
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        r#"A family party game of secret tells and secret missions has just finished. Here is how everyone played:
{listed}

Invent one playful award for each player, based on how they played. Keep it kind, funny and family-friendly.

Answer with a JSON object in exactly this shape:
{{ "awards": [{{ "name": "<player name>", "award": "<award title>", "reason": "<one sentence>" }}] }}"#,
        listed = listed,
    )
}
