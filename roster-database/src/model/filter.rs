//! Optional listing criteria and the conditions they reduce to.
//!
//! A [`PlayerFilter`] is plain data. [`PlayerFilter::conditions`] turns it into
//! a flat list of [`Condition`]s that are ANDed together; an empty list matches
//! every record. Backends interpret the list themselves: the memory store via
//! [`Condition::matches`], PostgreSQL by rendering each condition to SQL.

use serde::Deserialize;

use crate::model::archetype::{Profession, Race};
use crate::model::error::ValidationError;
use crate::model::player::Player;

/// Filter criteria exactly as they arrive in a query string.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<String>,
    pub profession: Option<String>,
    pub after: Option<i64>,
    pub before: Option<i64>,
    pub banned: Option<bool>,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    pub min_level: Option<i32>,
    pub max_level: Option<i32>,
}

/// Typed listing criteria. Every field is independent and optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub banned: Option<bool>,
    /// Inclusive lower bound on the birthday, unix milliseconds.
    pub after: Option<i64>,
    /// Inclusive upper bound on the birthday, unix milliseconds.
    pub before: Option<i64>,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    pub min_level: Option<i32>,
    pub max_level: Option<i32>,
}

/// One clause of a conjunctive player predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    NameContains(String),
    TitleContains(String),
    RaceIs(Race),
    ProfessionIs(Profession),
    BannedIs(bool),
    BornAtOrAfter(i64),
    BornAtOrBefore(i64),
    ExperienceAtLeast(i32),
    ExperienceAtMost(i32),
    LevelAtLeast(i32),
    LevelAtMost(i32),
}

impl TryFrom<FilterParams> for PlayerFilter {
    type Error = ValidationError;

    fn try_from(params: FilterParams) -> Result<Self, Self::Error> {
        Ok(Self {
            name: params.name,
            title: params.title,
            race: params.race.as_deref().map(str::parse).transpose()?,
            profession: params.profession.as_deref().map(str::parse).transpose()?,
            banned: params.banned,
            after: params.after,
            before: params.before,
            min_experience: params.min_experience,
            max_experience: params.max_experience,
            min_level: params.min_level,
            max_level: params.max_level,
        })
    }
}

impl PlayerFilter {
    /// Reduce the criteria to the conditions a record must satisfy.
    /// Empty substring patterns impose no constraint.
    pub fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();

        if let Some(name) = self.name.as_ref().filter(|name| !name.is_empty()) {
            conditions.push(Condition::NameContains(name.clone()));
        }
        if let Some(title) = self.title.as_ref().filter(|title| !title.is_empty()) {
            conditions.push(Condition::TitleContains(title.clone()));
        }
        if let Some(race) = self.race {
            conditions.push(Condition::RaceIs(race));
        }
        if let Some(profession) = self.profession {
            conditions.push(Condition::ProfessionIs(profession));
        }
        if let Some(banned) = self.banned {
            conditions.push(Condition::BannedIs(banned));
        }
        if let Some(after) = self.after {
            conditions.push(Condition::BornAtOrAfter(after));
        }
        if let Some(before) = self.before {
            conditions.push(Condition::BornAtOrBefore(before));
        }
        if let Some(min) = self.min_experience {
            conditions.push(Condition::ExperienceAtLeast(min));
        }
        if let Some(max) = self.max_experience {
            conditions.push(Condition::ExperienceAtMost(max));
        }
        if let Some(min) = self.min_level {
            conditions.push(Condition::LevelAtLeast(min));
        }
        if let Some(max) = self.max_level {
            conditions.push(Condition::LevelAtMost(max));
        }

        conditions
    }
}

impl Condition {
    /// Evaluate the condition against a record. Unset fields never match,
    /// mirroring SQL comparisons against NULL.
    pub fn matches(&self, player: &Player) -> bool {
        match self {
            Condition::NameContains(pattern) => {
                player.name().is_some_and(|name| name.contains(pattern.as_str()))
            }
            Condition::TitleContains(pattern) => {
                player.title().is_some_and(|title| title.contains(pattern.as_str()))
            }
            Condition::RaceIs(race) => player.race() == Some(*race),
            Condition::ProfessionIs(profession) => player.profession() == Some(*profession),
            Condition::BannedIs(banned) => player.banned() == Some(*banned),
            Condition::BornAtOrAfter(millis) => {
                player.birthday_millis().is_some_and(|born| born >= *millis)
            }
            Condition::BornAtOrBefore(millis) => {
                player.birthday_millis().is_some_and(|born| born <= *millis)
            }
            Condition::ExperienceAtLeast(min) => player.experience().is_some_and(|xp| xp >= *min),
            Condition::ExperienceAtMost(max) => player.experience().is_some_and(|xp| xp <= *max),
            Condition::LevelAtLeast(min) => player.level().is_some_and(|level| level >= *min),
            Condition::LevelAtMost(max) => player.level().is_some_and(|level| level <= *max),
        }
    }
}
