use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use roster_utils::time::{date_from_millis, millis_from_date};

use crate::model::archetype::{Profession, Race};
use crate::model::error::ValidationError;
use crate::model::leveling::{experience_until_next_level, level_for_experience};

pub const NAME_MAX_LENGTH: usize = 12;
pub const TITLE_MAX_LENGTH: usize = 30;
pub const MIN_EXPERIENCE: i32 = 0;
pub const MAX_EXPERIENCE: i32 = 10_000_000;
pub const MIN_BIRTHDAY_YEAR: i32 = 2000;
pub const MAX_BIRTHDAY_YEAR: i32 = 3000;

/// Raw player body as sent by clients. Every field is optional; nothing here
/// has been validated yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    /// `Some(None)` when the body carries an explicit `null`.
    #[serde(default, deserialize_with = "explicit")]
    pub name: Option<Option<String>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub race: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default, deserialize_with = "explicit")]
    pub experience: Option<Option<i32>>,
    /// Unix timestamp in milliseconds.
    #[serde(default)]
    pub birthday: Option<i64>,
    #[serde(default)]
    pub banned: Option<bool>,
}

/// Keep a present-but-null field distinct from an absent one.
fn explicit<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// One game character.
///
/// Fields are optional so the same type can carry a full record, a creation
/// request, or a partial update. Every setter validates its input, and the
/// level fields are only ever written by [`Player::set_experience`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    id: Option<i64>,
    name: Option<String>,
    title: Option<String>,
    race: Option<Race>,
    profession: Option<Profession>,
    experience: Option<i32>,
    level: Option<i32>,
    until_next_level: Option<i32>,
    #[serde(serialize_with = "serialize_birthday")]
    birthday: Option<NaiveDate>,
    banned: Option<bool>,
}

impl Player {
    /// Build a complete, validated record without an id.
    pub fn new(
        name: &str,
        title: Option<&str>,
        race: Race,
        profession: Profession,
        experience: i32,
        birthday: NaiveDate,
        banned: bool,
    ) -> Result<Self, ValidationError> {
        let mut player = Self::default();
        player.set_name(Some(name.to_owned()))?;
        player.set_title(title.map(str::to_owned))?;
        player.set_race(Some(race));
        player.set_profession(Some(profession));
        player.set_experience(Some(experience))?;
        player.set_birthday(Some(millis_from_date(birthday)))?;
        player.set_banned(Some(banned));
        Ok(player)
    }

    /// Apply a client payload field by field. Fields absent from the payload
    /// stay unset so the result can still act as a partial update. An explicit
    /// `null` goes through the setter: it is rejected for `name` and means 0
    /// for `experience`.
    pub fn from_payload(payload: PlayerPayload) -> Result<Self, ValidationError> {
        let mut player = Self::default();

        if let Some(name) = payload.name {
            player.set_name(name)?;
        }
        player.set_title(payload.title)?;
        player.race = payload.race.as_deref().map(str::parse).transpose()?;
        player.profession = payload.profession.as_deref().map(str::parse).transpose()?;
        if let Some(experience) = payload.experience {
            player.set_experience(experience)?;
        }
        player.set_birthday(payload.birthday)?;
        player.banned = payload.banned;

        Ok(player)
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) -> Result<(), ValidationError> {
        check_name(name.as_deref())?;
        self.name = name;
        Ok(())
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) -> Result<(), ValidationError> {
        check_title(title.as_deref())?;
        self.title = title;
        Ok(())
    }

    pub fn race(&self) -> Option<Race> {
        self.race
    }

    pub fn set_race(&mut self, race: Option<Race>) {
        self.race = race;
    }

    pub fn profession(&self) -> Option<Profession> {
        self.profession
    }

    pub fn set_profession(&mut self, profession: Option<Profession>) {
        self.profession = profession;
    }

    pub fn experience(&self) -> Option<i32> {
        self.experience
    }

    /// Set experience (absent means 0) and recompute both level fields.
    pub fn set_experience(&mut self, experience: Option<i32>) -> Result<(), ValidationError> {
        let experience = experience.unwrap_or(MIN_EXPERIENCE);
        check_experience(experience)?;

        let level = level_for_experience(experience);
        self.experience = Some(experience);
        self.level = Some(level);
        self.until_next_level = Some(experience_until_next_level(level, experience));
        Ok(())
    }

    pub fn level(&self) -> Option<i32> {
        self.level
    }

    pub fn until_next_level(&self) -> Option<i32> {
        self.until_next_level
    }

    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday
    }

    /// Birthday as a unix timestamp in milliseconds (UTC midnight).
    pub fn birthday_millis(&self) -> Option<i64> {
        self.birthday.map(millis_from_date)
    }

    /// Set the birthday from a unix timestamp in milliseconds. Absent clears it.
    pub fn set_birthday(&mut self, millis: Option<i64>) -> Result<(), ValidationError> {
        self.birthday = match millis {
            Some(millis) => Some(check_birthday(millis)?),
            None => None,
        };
        Ok(())
    }

    pub fn banned(&self) -> Option<bool> {
        self.banned
    }

    pub fn set_banned(&mut self, banned: Option<bool>) {
        self.banned = banned;
    }

    /// Name, race, profession, birthday and experience must be present
    /// before a record can be inserted. Title is optional.
    pub fn check_required_for_create(&self) -> Result<(), ValidationError> {
        let complete = self.name.is_some()
            && self.race.is_some()
            && self.profession.is_some()
            && self.birthday.is_some()
            && self.experience.is_some();

        if complete {
            Ok(())
        } else {
            Err(ValidationError::MissingRequired)
        }
    }

    /// True when no filterable field was supplied, i.e. an update that changes nothing.
    pub fn is_entirely_unset(&self) -> bool {
        self.name.is_none()
            && self.title.is_none()
            && self.race.is_none()
            && self.profession.is_none()
            && self.birthday.is_none()
            && self.experience.is_none()
    }

    /// Fill every unset field from `other`, then re-validate the result.
    pub fn merge_missing_from(&mut self, other: &Player) -> Result<(), ValidationError> {
        if self.name.is_none() {
            self.name = other.name.clone();
        }
        if self.title.is_none() {
            self.title = other.title.clone();
        }
        if self.race.is_none() {
            self.race = other.race;
        }
        if self.profession.is_none() {
            self.profession = other.profession;
        }
        if self.birthday.is_none() {
            self.birthday = other.birthday;
        }
        if self.experience.is_none() {
            self.set_experience(other.experience)?;
        }
        if self.banned.is_none() {
            self.banned = other.banned;
        }

        self.validate_all()
    }

    /// Re-check every validated field and recompute the level fields.
    pub fn validate_all(&mut self) -> Result<(), ValidationError> {
        check_name(self.name.as_deref())?;
        check_title(self.title.as_deref())?;
        if let Some(birthday) = self.birthday {
            check_birthday_year(birthday)?;
        }
        self.set_experience(self.experience)
    }
}

fn check_name(name: Option<&str>) -> Result<(), ValidationError> {
    match name {
        Some(name) if !name.is_empty() && name.chars().count() <= NAME_MAX_LENGTH => Ok(()),
        _ => Err(ValidationError::Name),
    }
}

fn check_title(title: Option<&str>) -> Result<(), ValidationError> {
    match title {
        Some(title) if title.chars().count() > TITLE_MAX_LENGTH => Err(ValidationError::Title),
        _ => Ok(()),
    }
}

fn check_experience(experience: i32) -> Result<(), ValidationError> {
    if (MIN_EXPERIENCE..=MAX_EXPERIENCE).contains(&experience) {
        Ok(())
    } else {
        Err(ValidationError::Experience)
    }
}

fn check_birthday(millis: i64) -> Result<NaiveDate, ValidationError> {
    if millis < 0 {
        return Err(ValidationError::NegativeBirthday);
    }

    let date = date_from_millis(millis).ok_or(ValidationError::Birthday)?;
    check_birthday_year(date)?;
    Ok(date)
}

fn check_birthday_year(date: NaiveDate) -> Result<(), ValidationError> {
    if (MIN_BIRTHDAY_YEAR..=MAX_BIRTHDAY_YEAR).contains(&date.year()) {
        Ok(())
    } else {
        Err(ValidationError::Birthday)
    }
}

fn serialize_birthday<S>(birthday: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match birthday {
        Some(date) => serializer.serialize_some(&millis_from_date(*date)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use roster_utils::time::millis_from_date;

    use super::{Player, PlayerPayload};
    use crate::model::archetype::{Profession, Race};
    use crate::model::error::ValidationError;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn sample() -> Player {
        let mut player = Player::new(
            "Abc",
            Some("The Brave"),
            Race::Elf,
            Profession::Warrior,
            1_500,
            date(2010, 5, 17),
            false,
        )
        .unwrap();
        player.set_id(7);
        player
    }

    #[test]
    fn name_bounds() {
        let mut player = Player::default();
        assert_eq!(player.set_name(None), Err(ValidationError::Name));
        assert_eq!(player.set_name(Some(String::new())), Err(ValidationError::Name));
        assert_eq!(
            player.set_name(Some("abcdefghijklm".to_owned())),
            Err(ValidationError::Name)
        );
        assert_eq!(player.name(), None);

        player.set_name(Some("abcdefghijkl".to_owned())).unwrap();
        assert_eq!(player.name(), Some("abcdefghijkl"));
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let mut player = Player::default();
        player.set_name(Some("ÆÐÞæðþÆÐÞæðþ".to_owned())).unwrap();
        assert_eq!(player.name().map(|name| name.chars().count()), Some(12));
    }

    #[test]
    fn title_bounds() {
        let mut player = Player::default();
        player.set_title(None).unwrap();
        player.set_title(Some(String::new())).unwrap();
        player.set_title(Some("x".repeat(30))).unwrap();
        assert_eq!(
            player.set_title(Some("x".repeat(31))),
            Err(ValidationError::Title)
        );
        assert_eq!(player.title().map(str::len), Some(30));
    }

    #[test]
    fn absent_experience_becomes_zero() {
        let mut player = Player::default();
        player.set_experience(None).unwrap();
        assert_eq!(player.experience(), Some(0));
        assert_eq!(player.level(), Some(0));
        assert_eq!(player.until_next_level(), Some(100));
    }

    #[test]
    fn experience_bounds_and_derived_fields() {
        let mut player = Player::default();
        assert_eq!(player.set_experience(Some(-1)), Err(ValidationError::Experience));
        assert_eq!(
            player.set_experience(Some(10_000_001)),
            Err(ValidationError::Experience)
        );

        player.set_experience(Some(10_000_000)).unwrap();
        assert_eq!(player.level(), Some(446));
        assert_eq!(player.until_next_level(), Some(50 * 447 * 448 - 10_000_000));

        player.set_experience(Some(500)).unwrap();
        assert_eq!(player.level(), Some(2));
        assert_eq!(player.until_next_level(), Some(100));
    }

    #[test]
    fn birthday_year_boundaries() {
        let mut player = Player::default();

        player
            .set_birthday(Some(millis_from_date(date(2000, 1, 1))))
            .unwrap();
        assert_eq!(player.birthday(), Some(date(2000, 1, 1)));

        player
            .set_birthday(Some(millis_from_date(date(3000, 1, 1))))
            .unwrap();
        assert_eq!(player.birthday(), Some(date(3000, 1, 1)));

        assert_eq!(
            player.set_birthday(Some(millis_from_date(date(1999, 12, 31)))),
            Err(ValidationError::Birthday)
        );
        assert_eq!(
            player.set_birthday(Some(millis_from_date(date(3001, 1, 1)))),
            Err(ValidationError::Birthday)
        );
        assert_eq!(player.birthday(), Some(date(3000, 1, 1)));
    }

    #[test]
    fn negative_birthday_has_its_own_error() {
        let mut player = Player::default();
        assert_eq!(
            player.set_birthday(Some(-1)),
            Err(ValidationError::NegativeBirthday)
        );
        assert_eq!(player.set_birthday(Some(0)), Err(ValidationError::Birthday));
    }

    #[test]
    fn absent_birthday_is_unset() {
        let mut player = sample();
        player.set_birthday(None).unwrap();
        assert_eq!(player.birthday(), None);
        assert_eq!(player.birthday_millis(), None);
    }

    #[test]
    fn required_fields_exclude_title() {
        let mut player = sample();
        player.set_title(None).unwrap();
        player.check_required_for_create().unwrap();

        let mut missing_race = sample();
        missing_race.set_race(None);
        assert_eq!(
            missing_race.check_required_for_create(),
            Err(ValidationError::MissingRequired)
        );

        let payload = PlayerPayload {
            name: Some(Some("Abc".to_owned())),
            race: Some("ELF".to_owned()),
            profession: Some("WARRIOR".to_owned()),
            birthday: Some(millis_from_date(date(2000, 1, 1))),
            ..PlayerPayload::default()
        };
        let without_experience = Player::from_payload(payload).unwrap();
        assert_eq!(
            without_experience.check_required_for_create(),
            Err(ValidationError::MissingRequired)
        );
    }

    #[test]
    fn entirely_unset_ignores_banned_and_id() {
        let mut patch = Player::default();
        assert!(patch.is_entirely_unset());

        patch.set_banned(Some(true));
        patch.set_id(3);
        assert!(patch.is_entirely_unset());

        patch.set_title(Some("Lord".to_owned())).unwrap();
        assert!(!patch.is_entirely_unset());
    }

    #[test]
    fn merge_keeps_supplied_fields_and_fills_the_rest() {
        let existing = sample();

        let mut patch = Player::default();
        patch.set_experience(Some(500)).unwrap();
        patch.merge_missing_from(&existing).unwrap();

        assert_eq!(patch.name(), existing.name());
        assert_eq!(patch.title(), existing.title());
        assert_eq!(patch.race(), existing.race());
        assert_eq!(patch.profession(), existing.profession());
        assert_eq!(patch.birthday(), existing.birthday());
        assert_eq!(patch.banned(), existing.banned());
        assert_eq!(patch.experience(), Some(500));
        assert_eq!(patch.level(), Some(2));
        assert_eq!(patch.until_next_level(), Some(100));
    }

    #[test]
    fn merge_recomputes_levels_from_copied_experience() {
        let existing = sample();

        let mut patch = Player::default();
        patch.set_name(Some("Renamed".to_owned())).unwrap();
        patch.merge_missing_from(&existing).unwrap();

        assert_eq!(patch.name(), Some("Renamed"));
        assert_eq!(patch.experience(), Some(1_500));
        assert_eq!(patch.level(), existing.level());
        assert_eq!(patch.until_next_level(), existing.until_next_level());
    }

    #[test]
    fn payload_fields_go_through_setters() {
        let payload = PlayerPayload {
            name: Some(Some("Abc".to_owned())),
            race: Some("ELF".to_owned()),
            profession: Some("WARRIOR".to_owned()),
            birthday: Some(millis_from_date(date(2000, 1, 1))),
            experience: Some(Some(0)),
            ..PlayerPayload::default()
        };
        let player = Player::from_payload(payload).unwrap();
        assert_eq!(player.race(), Some(Race::Elf));
        assert_eq!(player.profession(), Some(Profession::Warrior));
        assert_eq!(player.level(), Some(0));
        assert_eq!(player.until_next_level(), Some(100));
        assert_eq!(player.banned(), None);

        let bad_name = PlayerPayload {
            name: Some(Some(String::new())),
            ..PlayerPayload::default()
        };
        assert_eq!(Player::from_payload(bad_name), Err(ValidationError::Name));

        let bad_race = PlayerPayload {
            race: Some("WIZARD".to_owned()),
            ..PlayerPayload::default()
        };
        assert_eq!(
            Player::from_payload(bad_race),
            Err(ValidationError::UnknownRace("WIZARD".to_owned()))
        );

        assert!(Player::from_payload(PlayerPayload::default())
            .unwrap()
            .is_entirely_unset());
    }

    #[test]
    fn explicit_null_differs_from_absent_field() {
        let absent: PlayerPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.name, None);
        assert!(Player::from_payload(absent).unwrap().is_entirely_unset());

        let null_name: PlayerPayload = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(null_name.name, Some(None));
        assert_eq!(Player::from_payload(null_name), Err(ValidationError::Name));

        let null_experience: PlayerPayload =
            serde_json::from_str(r#"{"experience": null}"#).unwrap();
        let player = Player::from_payload(null_experience).unwrap();
        assert_eq!(player.experience(), Some(0));
        assert_eq!(player.level(), Some(0));
        assert_eq!(player.until_next_level(), Some(100));
    }

    #[test]
    fn serializes_camel_case_with_millisecond_birthday() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["race"], "ELF");
        assert_eq!(json["profession"], "WARRIOR");
        assert_eq!(json["level"], 5);
        assert_eq!(json["untilNextLevel"], 600);
        assert_eq!(json["birthday"], millis_from_date(date(2010, 5, 17)));
        assert_eq!(json["banned"], false);
    }
}
