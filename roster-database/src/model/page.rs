use std::cmp::Ordering;
use std::str::FromStr;

use serde::Deserialize;

use crate::model::error::ValidationError;
use crate::model::player::Player;

pub const DEFAULT_PAGE_NUMBER: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Field a player listing is sorted by, ascending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayerOrder {
    #[default]
    Id,
    Name,
    Experience,
    Birthday,
    Level,
}

impl PlayerOrder {
    /// Column backing this order in the `player` table.
    pub fn column(self) -> &'static str {
        match self {
            PlayerOrder::Id => "id",
            PlayerOrder::Name => "name",
            PlayerOrder::Experience => "experience",
            PlayerOrder::Birthday => "birthday",
            PlayerOrder::Level => "level",
        }
    }

    /// Compare two records by this field, falling back to id.
    pub fn compare(self, left: &Player, right: &Player) -> Ordering {
        let primary = match self {
            PlayerOrder::Id => Ordering::Equal,
            PlayerOrder::Name => left.name().cmp(&right.name()),
            PlayerOrder::Experience => left.experience().cmp(&right.experience()),
            PlayerOrder::Birthday => left.birthday().cmp(&right.birthday()),
            PlayerOrder::Level => left.level().cmp(&right.level()),
        };

        primary.then_with(|| left.id().cmp(&right.id()))
    }
}

impl FromStr for PlayerOrder {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ID" => Ok(PlayerOrder::Id),
            "NAME" => Ok(PlayerOrder::Name),
            "EXPERIENCE" => Ok(PlayerOrder::Experience),
            "BIRTHDAY" => Ok(PlayerOrder::Birthday),
            "LEVEL" => Ok(PlayerOrder::Level),
            _ => Err(ValidationError::UnknownOrder(raw.to_owned())),
        }
    }
}

/// Zero-based page of a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(number: u32, size: u32) -> Result<Self, ValidationError> {
        if size == 0 {
            return Err(ValidationError::PageSize);
        }

        Ok(Self { number, size })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of records skipped before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }
}

/// Sorting and paging parameters exactly as they arrive in a query string.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub order: Option<String>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageParams {
    pub fn resolve(&self) -> Result<(PlayerOrder, PageRequest), ValidationError> {
        let order = match self.order.as_deref() {
            Some(raw) => raw.parse()?,
            None => PlayerOrder::default(),
        };
        let page = PageRequest::new(
            self.page_number.unwrap_or(DEFAULT_PAGE_NUMBER),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?;

        Ok((order, page))
    }
}
