table! {
    game_state (id) {
        id -> Integer,
        status -> Text,
        started_at -> Nullable<Timestamp>,
        ended_at -> Nullable<Timestamp>,
        team_name_winners -> Nullable<Text>,
        fun_awards -> Nullable<Text>,
    }
}

table! {
    generated_options (id) {
        id -> Integer,
        player_id -> Integer,
        kind -> Text,
        option_text -> Text,
        option_number -> Integer,
        is_selected -> Bool,
        created_at -> Timestamp,
    }
}

table! {
    guesses (id) {
        id -> Integer,
        guesser_id -> Integer,
        target_player_id -> Integer,
        free_text_guess -> Text,
        matched_option_id -> Nullable<Integer>,
        ai_reasoning -> Nullable<Text>,
        judge_status -> Text,
        guessed_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    mission_completions (id) {
        id -> Integer,
        player_id -> Integer,
        involved_player_id -> Integer,
        completed_at -> Timestamp,
    }
}

table! {
    players (id) {
        id -> Integer,
        name -> Text,
        team_number -> Integer,
        is_admin -> Bool,
        is_logged_in -> Bool,
        logged_in_at -> Nullable<Timestamp>,
        team_name_suggestion -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

table! {
    selections (id) {
        id -> Integer,
        player_id -> Integer,
        kind -> Text,
        option_id -> Integer,
        image_url -> Nullable<Text>,
        selected_at -> Timestamp,
    }
}

joinable!(generated_options -> players (player_id));
joinable!(selections -> generated_options (option_id));
joinable!(selections -> players (player_id));

allow_tables_to_appear_in_same_query!(
    game_state,
    generated_options,
    guesses,
    mission_completions,
    players,
    selections,
);
