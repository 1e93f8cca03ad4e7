//! Metadata queries over parsed PGN games.
//!
//! A query is a comma-separated list of `key OP value` conditions, all of
//! which must hold: `elo>2700,player=carlsen,result=1-0`. Text tags match
//! by case-insensitive substring; numeric tags compare as integers.

use thiserror::Error;

use crate::game::Game;

/// Every tag a condition may reference. `Elo` and `Player` are computed:
/// `Elo` is the lower of the two ratings when both are known, `Player`
/// matches either color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Event,
    Site,
    Date,
    Round,
    White,
    Black,
    Result,
    WhiteElo,
    BlackElo,
    Eco,
    EventDate,
    Source,
    Fen,
    Elo,
    Player,
}

impl Tag {
    pub fn parse(name: &str) -> Option<Tag> {
        match name.to_ascii_lowercase().as_str() {
            "event" => Some(Tag::Event),
            "site" => Some(Tag::Site),
            "date" => Some(Tag::Date),
            "round" => Some(Tag::Round),
            "white" => Some(Tag::White),
            "black" => Some(Tag::Black),
            "result" => Some(Tag::Result),
            "whiteelo" => Some(Tag::WhiteElo),
            "blackelo" => Some(Tag::BlackElo),
            "eco" => Some(Tag::Eco),
            "eventdate" => Some(Tag::EventDate),
            "source" => Some(Tag::Source),
            "fen" => Some(Tag::Fen),
            "elo" => Some(Tag::Elo),
            "player" => Some(Tag::Player),
            _ => None,
        }
    }
}

/// A tag's value as seen by the comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagValue<'a> {
    Text(&'a str),
    Number(i64),
}

/// Resolves a tag against a game.
pub fn lookup<'a>(tag: Tag, game: &'a Game) -> TagValue<'a> {
    match tag {
        Tag::Event => TagValue::Text(&game.event),
        Tag::Site => TagValue::Text(&game.site),
        Tag::Date => TagValue::Text(&game.date),
        Tag::Round => TagValue::Text(&game.round),
        Tag::White => TagValue::Text(&game.white),
        Tag::Black => TagValue::Text(&game.black),
        Tag::Result => TagValue::Text(&game.result),
        Tag::WhiteElo => TagValue::Number(game.white_elo as i64),
        Tag::BlackElo => TagValue::Number(game.black_elo as i64),
        Tag::Eco => TagValue::Text(&game.eco),
        Tag::EventDate => TagValue::Text(&game.event_date),
        Tag::Source => TagValue::Text(&game.source),
        Tag::Fen => TagValue::Text(&game.fen),
        Tag::Elo => {
            if game.white_elo > 0 && game.black_elo > 0 {
                TagValue::Number(game.white_elo.min(game.black_elo) as i64)
            } else {
                TagValue::Number(0)
            }
        }
        // matched per-color by Condition
        Tag::Player => TagValue::Text(""),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Lt => "<",
            Op::Ge => ">=",
            Op::Le => "<=",
        }
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid condition: {0:?}")]
    InvalidCondition(String),
    #[error("unknown tag: {0:?}")]
    UnknownTag(String),
    #[error("operator {op} does not apply to text tag {tag:?}")]
    BadOperator { tag: Tag, op: &'static str },
    #[error("invalid integer value: {0:?}")]
    InvalidInteger(String),
}

#[derive(Debug, Clone)]
pub struct Condition {
    pub tag: Tag,
    pub op: Op,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    conditions: Vec<Condition>,
}

impl Query {
    pub fn parse(input: &str) -> Result<Query, QueryError> {
        let mut conditions = Vec::new();

        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            conditions.push(Condition::parse(part)?);
        }

        Ok(Query { conditions })
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// True when every condition holds.
    pub fn matches(&self, game: &Game) -> Result<bool, QueryError> {
        for condition in &self.conditions {
            if !condition.matches(game)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

// longest symbols first so ">=" is not read as ">"
const OPERATORS: [(&str, Op); 6] = [
    (">=", Op::Ge),
    ("<=", Op::Le),
    ("!=", Op::Ne),
    ("=", Op::Eq),
    (">", Op::Gt),
    ("<", Op::Lt),
];

impl Condition {
    fn parse(part: &str) -> Result<Condition, QueryError> {
        for (symbol, op) in OPERATORS {
            if let Some((key, value)) = part.split_once(symbol) {
                let key = key.trim();
                let tag =
                    Tag::parse(key).ok_or_else(|| QueryError::UnknownTag(key.to_string()))?;
                return Ok(Condition {
                    tag,
                    op,
                    value: value.trim().to_string(),
                });
            }
        }
        Err(QueryError::InvalidCondition(part.to_string()))
    }

    fn matches(&self, game: &Game) -> Result<bool, QueryError> {
        if self.tag == Tag::Player {
            return Ok(self.matches_text(&game.white)? || self.matches_text(&game.black)?);
        }

        match lookup(self.tag, game) {
            TagValue::Text(value) => self.matches_text(value),
            TagValue::Number(value) => self.matches_number(value),
        }
    }

    fn matches_text(&self, value: &str) -> Result<bool, QueryError> {
        let haystack = value.to_lowercase();
        let needle = self.value.to_lowercase();
        match self.op {
            Op::Eq => Ok(haystack.contains(&needle)),
            Op::Ne => Ok(!haystack.contains(&needle)),
            op => Err(QueryError::BadOperator {
                tag: self.tag,
                op: op.symbol(),
            }),
        }
    }

    fn matches_number(&self, value: i64) -> Result<bool, QueryError> {
        let wanted: i64 = self
            .value
            .parse()
            .map_err(|_| QueryError::InvalidInteger(self.value.clone()))?;
        Ok(match self.op {
            Op::Eq => value == wanted,
            Op::Ne => value != wanted,
            Op::Gt => value > wanted,
            Op::Lt => value < wanted,
            Op::Ge => value >= wanted,
            Op::Le => value <= wanted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        Game {
            event: "Moscow Aeroflot op-A 17th".to_string(),
            site: "Moscow".to_string(),
            date: "2018.02.21".to_string(),
            round: "2".to_string(),
            white: "Andreikin, Dmitry".to_string(),
            black: "Vavulin, Maksim".to_string(),
            result: "1/2-1/2".to_string(),
            white_elo: 2712,
            black_elo: 2575,
            ..Game::default()
        }
    }

    #[test]
    fn parses_multi_condition_queries() {
        let query = Query::parse("elo>2500, player=vavulin, result=1/2").unwrap();
        assert_eq!(query.conditions().len(), 3);
        assert_eq!(query.conditions()[0].tag, Tag::Elo);
        assert_eq!(query.conditions()[0].op, Op::Gt);
        assert!(query.matches(&game()).unwrap());
    }

    #[test]
    fn two_character_operators_win_over_their_prefix() {
        let query = Query::parse("whiteelo>=2712").unwrap();
        assert_eq!(query.conditions()[0].op, Op::Ge);
        assert!(query.matches(&game()).unwrap());
    }

    #[test]
    fn text_matching_is_case_insensitive_substring() {
        let query = Query::parse("white=ANDREIKIN").unwrap();
        assert!(query.matches(&game()).unwrap());

        let query = Query::parse("site!=moscow").unwrap();
        assert!(!query.matches(&game()).unwrap());
    }

    #[test]
    fn player_matches_either_color() {
        assert!(Query::parse("player=andreikin")
            .unwrap()
            .matches(&game())
            .unwrap());
        assert!(Query::parse("player=vavulin")
            .unwrap()
            .matches(&game())
            .unwrap());
        assert!(!Query::parse("player=carlsen")
            .unwrap()
            .matches(&game())
            .unwrap());
    }

    #[test]
    fn computed_elo_is_the_lower_rating() {
        assert!(Query::parse("elo=2575").unwrap().matches(&game()).unwrap());
        assert!(!Query::parse("elo>2600").unwrap().matches(&game()).unwrap());

        let mut unrated = game();
        unrated.black_elo = 0;
        assert!(Query::parse("elo=0").unwrap().matches(&unrated).unwrap());
    }

    #[test]
    fn failed_conditions_short_circuit_to_false() {
        let query = Query::parse("elo>2500,player=carlsen").unwrap();
        assert!(!query.matches(&game()).unwrap());
    }

    #[test]
    fn unknown_tags_and_bad_values_error() {
        assert!(matches!(
            Query::parse("opening=sicilian"),
            Err(QueryError::UnknownTag(_))
        ));
        assert!(matches!(
            Query::parse("player"),
            Err(QueryError::InvalidCondition(_))
        ));

        let query = Query::parse("whiteelo>high").unwrap();
        assert!(matches!(
            query.matches(&game()),
            Err(QueryError::InvalidInteger(_))
        ));

        let query = Query::parse("white>2000").unwrap();
        assert!(matches!(
            query.matches(&game()),
            Err(QueryError::BadOperator { .. })
        ));
    }
}
