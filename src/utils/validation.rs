use crate::domain::model::Roster;
use crate::utils::error::{Result, SantaError};
use std::collections::HashSet;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let display = path.display().to_string();

    if display.is_empty() {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display,
            reason: "Path cannot be empty".to_string(),
        });
    }

    if display.contains('\0') {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display,
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, path: &Path, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match path.extension().and_then(|ext| ext.to_str()) {
        Some(extension) if allowed_set.contains(extension) => Ok(()),
        Some(extension) => Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.display().to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.display().to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SantaError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Ids and names must be unique, allow-lists may only name other members of
/// the same roster. Exclusions are not checked since history can outlive a
/// participant.
impl Validate for Roster {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("group", self.group.as_str())?;

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for participant in self.participants() {
            validate_non_empty_string("participant.id", participant.id.as_str())?;
            validate_non_empty_string("participant.name", &participant.name)?;

            if !ids.insert(&participant.id) {
                return Err(SantaError::InvalidRoster {
                    message: format!("duplicate participant id '{}'", participant.id),
                });
            }
            if !names.insert(participant.name.as_str()) {
                return Err(SantaError::InvalidRoster {
                    message: format!("duplicate participant name '{}'", participant.name),
                });
            }
        }

        // Allow-lists may reference people by id or by name, so a name that is
        // someone else's id would be ambiguous.
        for participant in self.participants() {
            if let Some(owner) = self
                .participants()
                .find(|other| other.id.as_str() == participant.name && other.id != participant.id)
            {
                return Err(SantaError::InvalidRoster {
                    message: format!(
                        "name '{}' is also the id of {}",
                        participant.name, owner.name
                    ),
                });
            }
        }

        for entry in &self.entries {
            if entry.allowed.contains(&entry.participant.id) {
                return Err(SantaError::InvalidRoster {
                    message: format!(
                        "{} cannot be assigned to themselves",
                        entry.participant.name
                    ),
                });
            }
            if let Some(unknown) = entry.allowed.iter().find(|id| !ids.contains(id)) {
                return Err(SantaError::InvalidRoster {
                    message: format!(
                        "{} may only give to members of group '{}', '{}' is not one",
                        entry.participant.name, self.group, unknown
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GroupId, Participant, ParticipantId, RosterEntry};
    use std::path::PathBuf;

    fn entry(id: &str, name: &str) -> RosterEntry {
        RosterEntry::new(Participant {
            id: ParticipantId::new(id),
            name: name.to_string(),
            email: format!("{id}@example.com"),
            group: GroupId::new("family"),
        })
    }

    #[test]
    fn test_validate_file_extension() {
        let allowed = ["toml", "csv"];
        assert!(validate_file_extension("roster", &PathBuf::from("family.toml"), &allowed).is_ok());
        assert!(validate_file_extension("roster", &PathBuf::from("family.csv"), &allowed).is_ok());
        assert!(validate_file_extension("roster", &PathBuf::from("family.txt"), &allowed).is_err());
        assert!(validate_file_extension("roster", &PathBuf::from("family"), &allowed).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("year", 2024, 1900, 9999).is_ok());
        assert!(validate_range("year", 1024, 1900, 9999).is_err());
    }

    #[test]
    fn test_roster_rejects_duplicate_names() {
        let roster = Roster::new(
            GroupId::new("family"),
            vec![entry("a1", "Alex"), entry("a2", "Alex")],
        );
        assert!(matches!(roster.validate(), Err(SantaError::InvalidRoster { .. })));
    }

    #[test]
    fn test_roster_rejects_foreign_allow_list() {
        let roster = Roster::new(
            GroupId::new("family"),
            vec![entry("a", "Alex").allow(["z"]), entry("b", "Blake")],
        );
        let err = roster.validate().unwrap_err();
        assert!(err.to_string().contains("'z'"));
    }

    #[test]
    fn test_roster_rejects_name_shadowing_another_id() {
        let roster = Roster::new(
            GroupId::new("family"),
            vec![entry("bob", "Robert"), entry("rob", "bob"), entry("c", "Cleo")],
        );
        let err = roster.validate().unwrap_err();
        assert!(matches!(err, SantaError::InvalidRoster { .. }));
        assert!(err.to_string().contains("'bob'"));

        // A name matching the participant's own id is fine.
        let own = Roster::new(
            GroupId::new("family"),
            vec![entry("Alex", "Alex"), entry("b", "Blake")],
        );
        assert!(own.validate().is_ok());
    }

    #[test]
    fn test_roster_allows_stale_exclusions() {
        let roster = Roster::new(
            GroupId::new("family"),
            vec![entry("a", "Alex").exclude(["gone"]), entry("b", "Blake")],
        );
        assert!(roster.validate().is_ok());
    }
}
