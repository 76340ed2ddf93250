use thiserror::Error;

/// A field value was absent, out of range or malformed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field 'name' should be present, not empty and at most 12 characters")]
    Name,

    #[error("field 'title' should be at most 30 characters")]
    Title,

    #[error("field 'experience' should be between 0 and 10000000")]
    Experience,

    /// Birthdays before the unix epoch are reported separately from the year range.
    #[error("field 'birthday' should not be before 01.01.1970")]
    NegativeBirthday,

    #[error("field 'birthday' should fall within years 2000 to 3000")]
    Birthday,

    #[error("fields name, race, profession, birthday and experience are required")]
    MissingRequired,

    #[error("unknown race `{0}`")]
    UnknownRace(String),

    #[error("unknown profession `{0}`")]
    UnknownProfession(String),

    #[error("unknown sort order `{0}`")]
    UnknownOrder(String),

    #[error("page size should be at least 1")]
    PageSize,
}
