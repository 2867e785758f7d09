use chrono::{NaiveDateTime, Utc};
use diesel::{
    self, Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl,
    SqliteConnection,
};
use serde::{Deserialize, Serialize};

use errors::Error;

use crate::models::{GeneratedOption, OptionKind};
use crate::schema::selections;

#[derive(Clone, Debug, Deserialize, Identifiable, Queryable, Serialize)]
pub struct Selection {
    pub id: i32,
    pub player_id: i32,
    pub kind: String,
    pub option_id: i32,
    pub image_url: Option<String>,
    pub selected_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "selections"]
struct NewSelection<'a> {
    player_id: i32,
    kind: &'a str,
    option_id: i32,
}

impl Selection {
    /// Points the player's selection of `kind` at `option_id`. The option must be one the
    /// player was given. Any previously generated image is dropped.
    pub fn select(
        conn: &SqliteConnection,
        kind_value: OptionKind,
        player: i32,
        option: i32,
    ) -> Result<(Selection, GeneratedOption), Error> {
        use crate::schema::selections::dsl::{image_url, option_id, selected_at};

        conn.transaction::<(Selection, GeneratedOption), Error, _>(|| {
            let chosen = GeneratedOption::find_by_id(conn, option)?;
            if chosen.player_id != player || chosen.kind != kind_value.as_str() {
                return Err(Error::BadRequest(
                    "Option does not belong to this player".into(),
                ));
            }

            GeneratedOption::mark_selected(conn, &chosen)?;

            match Selection::find_by_player(conn, kind_value, player)? {
                Some(existing) => {
                    diesel::update(selections::table.find(existing.id))
                        .set((
                            option_id.eq(option),
                            image_url.eq(None::<String>),
                            selected_at.eq(Utc::now().naive_utc()),
                        ))
                        .execute(conn)?;
                }
                None => {
                    diesel::insert_into(selections::table)
                        .values(NewSelection {
                            player_id: player,
                            kind: kind_value.as_str(),
                            option_id: option,
                        })
                        .execute(conn)?;
                }
            }

            let selection = Selection::find_by_player(conn, kind_value, player)?
                .ok_or_else(|| Error::InternalServerError("Selection was not stored".into()))?;

            Ok((selection, chosen))
        })
    }

    pub fn find_by_player(
        conn: &SqliteConnection,
        kind_value: OptionKind,
        player: i32,
    ) -> Result<Option<Selection>, Error> {
        use crate::schema::selections::dsl::{kind, player_id, selections};

        let selection = selections
            .filter(player_id.eq(player))
            .filter(kind.eq(kind_value.as_str()))
            .first::<Selection>(conn)
            .optional()?;

        Ok(selection)
    }

    /// The player's selection joined with the chosen option.
    pub fn find_with_option(
        conn: &SqliteConnection,
        kind_value: OptionKind,
        player: i32,
    ) -> Result<Option<(Selection, GeneratedOption)>, Error> {
        use crate::schema::generated_options;
        use crate::schema::selections::dsl::{kind, player_id, selections};

        let result = selections
            .inner_join(generated_options::table)
            .filter(player_id.eq(player))
            .filter(kind.eq(kind_value.as_str()))
            .first::<(Selection, GeneratedOption)>(conn)
            .optional()?;

        Ok(result)
    }

    pub fn find_all(
        conn: &SqliteConnection,
        kind_value: OptionKind,
    ) -> Result<Vec<(Selection, GeneratedOption)>, Error> {
        use crate::schema::generated_options;
        use crate::schema::selections::dsl::{kind, player_id, selections};

        let results = selections
            .inner_join(generated_options::table)
            .filter(kind.eq(kind_value.as_str()))
            .order(player_id.asc())
            .load::<(Selection, GeneratedOption)>(conn)?;

        Ok(results)
    }

    /// Ids of every player holding a selection of `kind`.
    pub fn player_ids(conn: &SqliteConnection, kind_value: OptionKind) -> Result<Vec<i32>, Error> {
        use crate::schema::selections::dsl::{kind, player_id, selections};

        let results = selections
            .filter(kind.eq(kind_value.as_str()))
            .select(player_id)
            .order(player_id.asc())
            .load::<i32>(conn)?;

        Ok(results)
    }

    /// Stores a generated image, but only while the selection still points at the option
    /// the image was drawn for. Returns whether a row was updated.
    pub fn set_image_url(
        conn: &SqliteConnection,
        kind_value: OptionKind,
        player: i32,
        option: i32,
        url: &str,
    ) -> Result<bool, Error> {
        use crate::schema::selections::dsl::{image_url, kind, option_id, player_id, selections};

        let updated = diesel::update(
            selections
                .filter(player_id.eq(player))
                .filter(kind.eq(kind_value.as_str()))
                .filter(option_id.eq(option)),
        )
        .set(image_url.eq(Some(url)))
        .execute(conn)?;

        Ok(updated > 0)
    }
}
