//! Form-level validity

use contacts_fields::{FieldTypeRegistry, Record};

/// Names of the fields that make `record` invalid as a form.
///
/// A field is invalid when its type is unknown, when its type rejects the
/// value, or when it is listed in `required` and blank. A required field the
/// record lacks entirely is reported too.
pub fn invalid_fields(
    record: &Record,
    registry: &FieldTypeRegistry,
    required: &[String],
) -> Vec<String> {
    let mut invalid: Vec<String> = record
        .fields()
        .filter(|(name, field)| {
            let accepted = registry
                .get(&field.type_key)
                .is_some_and(|ft| ft.accepts(&field.value));
            let blank = field.value.trim().is_empty();
            !accepted || (blank && required.iter().any(|r| r == *name))
        })
        .map(|(name, _)| name.to_string())
        .collect();

    invalid.extend(required.iter().filter(|name| !record.contains(name)).cloned());
    invalid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn valid_record_has_no_invalid_fields() {
        let record = Record::new()
            .with_field("firstName", "Ann", "text")
            .with_field("email", "", "email");
        let registry = FieldTypeRegistry::builtin();
        assert!(invalid_fields(&record, &registry, &required(&["firstName"])).is_empty());
    }

    #[test]
    fn blank_required_and_rejected_values_are_reported() {
        let record = Record::new()
            .with_field("firstName", "  ", "text")
            .with_field("email", "nope", "email")
            .with_field("twitter", "@ann", "twitter");
        let registry = FieldTypeRegistry::builtin();
        assert_eq!(
            invalid_fields(&record, &registry, &required(&["firstName", "lastName"])),
            vec!["firstName", "email", "twitter", "lastName"]
        );
    }
}
