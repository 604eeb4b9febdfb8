//! Mess menus, one entry per (day, meal).

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::MenuId;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "day_of_week", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "MONDAY",
            Self::Tuesday => "TUESDAY",
            Self::Wednesday => "WEDNESDAY",
            Self::Thursday => "THURSDAY",
            Self::Friday => "FRIDAY",
            Self::Saturday => "SATURDAY",
            Self::Sunday => "SUNDAY",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "meal_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealType {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "BREAKFAST",
            Self::Lunch => "LUNCH",
            Self::Snacks => "SNACKS",
            Self::Dinner => "DINNER",
        }
    }
}

/// A row of the `mess_menus` table.
#[derive(Debug, Clone, FromRow)]
pub struct MessMenu {
    pub id: MenuId,
    pub day_of_week: DayOfWeek,
    pub meal_type: MealType,
    pub items: String,
    pub special_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Splits the stored comma separated items, trimming around each comma.
pub fn item_list(items: &str) -> Vec<String> {
    items
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuResponse {
    pub id: MenuId,
    pub day_of_week: DayOfWeek,
    pub meal_type: MealType,
    pub items: String,
    pub item_list: Vec<String>,
    pub special_note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<MessMenu> for MenuResponse {
    fn from(menu: MessMenu) -> Self {
        Self {
            id: menu.id,
            day_of_week: menu.day_of_week,
            meal_type: menu.meal_type,
            item_list: item_list(&menu.items),
            items: menu.items,
            special_note: menu.special_note,
            updated_at: menu.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyMenuResponse {
    pub day: DayOfWeek,
    pub meals: Vec<MenuResponse>,
}

/// Buckets menus into all seven days, Monday first. Days without entries get
/// an empty `meals` list; meals within a day are ordered breakfast to dinner.
pub fn weekly_menu(menus: Vec<MessMenu>) -> Vec<DailyMenuResponse> {
    let mut by_day: BTreeMap<DayOfWeek, Vec<MessMenu>> = BTreeMap::new();
    for menu in menus {
        by_day.entry(menu.day_of_week).or_default().push(menu);
    }

    DayOfWeek::ALL
        .iter()
        .map(|day| {
            let mut meals = by_day.remove(day).unwrap_or_default();
            meals.sort_by_key(|m| m.meal_type);
            DailyMenuResponse {
                day: *day,
                meals: meals.into_iter().map(MenuResponse::from).collect(),
            }
        })
        .collect()
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateMenuDto {
    pub day_of_week: DayOfWeek,
    pub meal_type: MealType,
    #[validate(
        length(min = 1, max = 500, message = "Items are required (max 500 characters)"),
        custom(function = "validate_not_blank")
    )]
    pub items: String,
    #[validate(length(max = 200, message = "Special note cannot exceed 200 characters"))]
    pub special_note: Option<String>,
}

/// Blank `items` are ignored rather than clearing the menu.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateMenuDto {
    #[validate(length(max = 500, message = "Items cannot exceed 500 characters"))]
    pub items: Option<String>,
    #[validate(length(max = 200, message = "Special note cannot exceed 200 characters"))]
    pub special_note: Option<String>,
}

impl MessMenu {
    pub fn apply(&mut self, update: &UpdateMenuDto) {
        if let Some(items) = update.items.as_ref().filter(|i| !i.trim().is_empty()) {
            self.items = items.clone();
        }
        if let Some(note) = &update.special_note {
            self.special_note = Some(note.clone());
        }
    }
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank")
            .with_message(std::borrow::Cow::from("Menu items are required")));
    }
    Ok(())
}
