use crate::domain::error::DomainError;
use crate::domain::model::{CompanyCreate, CompanyUpdate};
use crate::domain::repo::{SortField, SortKey};

pub const NAME_MAX_CHARS: usize = 15;
pub const DESCRIPTION_MAX_CHARS: usize = 3000;

/// # Errors
/// Returns the first failing field.
pub fn validate_create(create: &CompanyCreate) -> Result<(), DomainError> {
    validate_name(&create.name)?;
    validate_description(&create.description)?;
    validate_amount_of_employees(create.amount_of_employees)
}

/// Only the fields present in the patch are checked.
///
/// # Errors
/// Returns the first failing field.
pub fn validate_update(update: &CompanyUpdate) -> Result<(), DomainError> {
    if update.id.is_nil() {
        return Err(DomainError::validation("id", "cannot be blank"));
    }
    if let Some(name) = &update.name {
        validate_name(name)?;
    }
    if let Some(description) = &update.description {
        validate_description(description)?;
    }
    if let Some(amount) = update.amount_of_employees {
        validate_amount_of_employees(amount)?;
    }
    Ok(())
}

/// Parses `"<field> ASC|DESC"` entries. The direction is case-insensitive.
///
/// # Errors
/// Returns a validation error on `order_by` for the first unknown entry.
pub fn parse_order_by(entries: &[String]) -> Result<Vec<SortKey>, DomainError> {
    entries
        .iter()
        .map(String::as_str)
        .map(parse_sort_key)
        .collect()
}

fn parse_sort_key(entry: &str) -> Result<SortKey, DomainError> {
    let invalid =
        || DomainError::validation("order_by", format!("must be a valid value: '{entry}'"));

    let (field, direction) = entry.trim().split_once(' ').ok_or_else(invalid)?;
    let field = SortField::ALL
        .into_iter()
        .find(|f| f.as_str() == field)
        .ok_or_else(invalid)?;
    let descending = match direction.trim() {
        d if d.eq_ignore_ascii_case("asc") => false,
        d if d.eq_ignore_ascii_case("desc") => true,
        _ => return Err(invalid()),
    };
    Ok(SortKey { field, descending })
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::validation("name", "cannot be blank"));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(DomainError::validation(
            "name",
            format!("the length must be between 1 and {NAME_MAX_CHARS}"),
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), DomainError> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(DomainError::validation(
            "description",
            format!("the length must be no more than {DESCRIPTION_MAX_CHARS}"),
        ));
    }
    Ok(())
}

fn validate_amount_of_employees(amount: i32) -> Result<(), DomainError> {
    if amount == 0 {
        return Err(DomainError::validation(
            "amount_of_employees",
            "cannot be blank",
        ));
    }
    Ok(())
}
