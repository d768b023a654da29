//! Restaurant Data

use crate::domain::{
    fields::FieldUpdate,
    restaurants::{
        errors::RestaurantsServiceError,
        models::{Cuisines, MenuItemUuid, RestaurantUuid},
    },
};

/// New Restaurant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewRestaurant {
    pub uuid: RestaurantUuid,
    pub name: String,
    pub location: String,
    pub image: Option<String>,
    pub cuisines: Cuisines,
    pub menu: Vec<NewMenuItem>,
}

/// Restaurant Update Data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub cuisines: Option<Cuisines>,
    pub image: FieldUpdate<String>,
}

/// New Menu Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuItem {
    pub uuid: MenuItemUuid,
    pub name: String,
    pub price: u64,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Menu Item Update Data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<u64>,
    pub description: FieldUpdate<String>,
    pub image: FieldUpdate<String>,
}

/// Restaurant listing filters. Text filters match case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantFilter {
    pub search: Option<String>,
    pub location: Option<String>,
    pub min_rating: Option<f64>,
}

impl RestaurantFilter {
    pub(crate) fn validate(&self) -> Result<(), RestaurantsServiceError> {
        match self.min_rating {
            Some(rating) if !(0.0..=5.0).contains(&rating) => {
                Err(RestaurantsServiceError::InvalidRating)
            }
            _ => Ok(()),
        }
    }
}

impl NewRestaurant {
    pub(crate) fn normalized(self) -> Result<Self, RestaurantsServiceError> {
        Ok(Self {
            uuid: self.uuid,
            name: non_blank(&self.name, RestaurantsServiceError::InvalidName)?,
            location: non_blank(&self.location, RestaurantsServiceError::InvalidLocation)?,
            image: self.image.filter(|image| !image.trim().is_empty()),
            cuisines: normalize_cuisines(self.cuisines),
            menu: self
                .menu
                .into_iter()
                .map(NewMenuItem::normalized)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl NewMenuItem {
    pub(crate) fn normalized(self) -> Result<Self, RestaurantsServiceError> {
        Ok(Self {
            uuid: self.uuid,
            name: non_blank(&self.name, RestaurantsServiceError::InvalidMenuItemName)?,
            price: self.price,
            description: self.description.filter(|text| !text.trim().is_empty()),
            image: self.image.filter(|image| !image.trim().is_empty()),
        })
    }
}

pub(crate) fn non_blank(
    value: &str,
    error: RestaurantsServiceError,
) -> Result<String, RestaurantsServiceError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(error);
    }

    Ok(value.to_string())
}

/// Trim labels, drop blanks and duplicates while keeping the first occurrence.
pub(crate) fn normalize_cuisines(cuisines: Cuisines) -> Cuisines {
    let mut normalized = Cuisines::new();

    for cuisine in cuisines {
        let cuisine = cuisine.trim();

        if !cuisine.is_empty() && !normalized.iter().any(|seen| seen.eq_ignore_ascii_case(cuisine))
        {
            normalized.push(cuisine.to_string());
        }
    }

    normalized
}
