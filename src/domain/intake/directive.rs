//! Advisory text handed to the response generator.

use std::fmt::Write;

use crate::domain::foundation::AgentName;

use super::{FieldSchema, SubjectRecord};

const OVERALL_GUIDANCE: [&str; 3] = [
    "- Try to extract all missing information through natural conversation, but be direct and persistent in asking for it",
    "- Only extract information when clearly and directly stated by the user",
    "- Verify information is current, not past or future",
];

/// Renders what is known and, while anything is missing, how to ask for it.
pub fn render_status(schema: &FieldSchema, agent: &AgentName, record: &SubjectRecord) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_status(&mut out, schema, agent, record);
    out
}

fn write_status(
    out: &mut String,
    schema: &FieldSchema,
    agent: &AgentName,
    record: &SubjectRecord,
) -> std::fmt::Result {
    writeln!(out, "{} Status:\n", schema.title)?;

    let known: Vec<String> = record
        .known_fields()
        .map(|(name, value)| format!("- {}: {}", label_for(schema, name), value))
        .collect();
    if !known.is_empty() {
        writeln!(out, "Current Information:")?;
        writeln!(out, "{}\n", known.join("\n"))?;
    }

    let missing = record.missing_fields();
    if missing.is_empty() {
        writeln!(out, "Status: All necessary information has been collected.")?;
        write!(out, "Continue natural conversation without information gathering.")?;
        return Ok(());
    }

    writeln!(out, "CURRENT TASK FOR {}:", agent)?;
    writeln!(
        out,
        "{} should try to prioritize getting this information from the {} by asking them questions",
        agent, schema.subject_noun
    )?;
    writeln!(out, "Missing Information and Extraction Guidelines:\n")?;

    for name in missing {
        // Records are conformed to their schema, so every slot has a field entry.
        let Some(field) = schema.field(name) else {
            continue;
        };
        writeln!(out, "{}:", field.label)?;
        writeln!(out, "- Description: {}", field.guidance.description)?;
        writeln!(out, "- Valid Examples: {}", field.guidance.valid_examples)?;
        writeln!(out, "- Do Not Extract: {}", field.guidance.invalid_examples)?;
        writeln!(out, "- Instructions: {}\n", field.guidance.instructions)?;
    }

    writeln!(out, "Overall Guidance:")?;
    for line in OVERALL_GUIDANCE {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Safe text used when the status cannot be determined.
pub fn status_fallback(schema: &FieldSchema) -> String {
    format!(
        "Error accessing {} information. Continuing conversation normally.",
        schema.subject_noun
    )
}

/// The schema's completion directive once the record is complete, else empty.
pub fn completion_signal(schema: &FieldSchema, record: &SubjectRecord) -> String {
    if record.is_complete() {
        schema.completion_directive.clone()
    } else {
        String::new()
    }
}

fn label_for<'a>(schema: &'a FieldSchema, name: &'a str) -> &'a str {
    schema.field(name).map(|f| f.label.as_str()).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::intake::{ExtractedFields, SchemaTag};

    fn user_schema() -> FieldSchema {
        FieldSchema::builtin(SchemaTag::USER_PROFILE).unwrap()
    }

    fn joe() -> AgentName {
        AgentName::new("Joe").unwrap()
    }

    fn record_with(schema: &FieldSchema, fields: ExtractedFields) -> SubjectRecord {
        let mut record = SubjectRecord::empty(schema);
        record.merge(&fields, Timestamp::now());
        record
    }

    #[test]
    fn status_lists_known_fields_and_guidance_for_missing_ones() {
        let schema = user_schema();
        let record = record_with(&schema, ExtractedFields::new().with("name", "Alice"));

        let text = render_status(&schema, &joe(), &record);

        assert!(text.starts_with("User Information Status:"));
        assert!(text.contains("Current Information:\n- Name: Alice"));
        assert!(!text.contains("Name:\n- Description"));
        let location = text.find("Location:\n- Description: Current place of residence").unwrap();
        let occupation = text.find("Occupation:\n- Description: Current profession or job").unwrap();
        assert!(location < occupation);
        assert!(text.contains("CURRENT TASK FOR Joe:"));
        assert!(text.contains("- Only extract information when clearly and directly stated by the user"));
        assert!(text.contains("- Verify information is current, not past or future"));
    }

    #[test]
    fn status_for_empty_record_has_no_current_information() {
        let schema = user_schema();
        let text = render_status(&schema, &joe(), &SubjectRecord::empty(&schema));

        assert!(!text.contains("Current Information:"));
        assert!(text.contains("Name:\n- Description: User's full name"));
        assert!(text.contains("- Do Not Extract: nicknames, usernames"));
    }

    #[test]
    fn status_for_complete_record_stops_information_gathering() {
        let schema = user_schema();
        let record = record_with(
            &schema,
            ExtractedFields::new()
                .with("name", "David Chen")
                .with("location", "Chicago")
                .with("occupation", "dentist"),
        );

        let text = render_status(&schema, &joe(), &record);

        assert!(text.contains("- Location: Chicago"));
        assert!(text.contains("Status: All necessary information has been collected."));
        assert!(text.ends_with("Continue natural conversation without information gathering."));
        assert!(!text.contains("CURRENT TASK"));
    }

    #[test]
    fn fallback_names_the_subject() {
        let nft = FieldSchema::builtin(SchemaTag::NFT_REQUEST).unwrap();
        assert_eq!(
            status_fallback(&nft),
            "Error accessing NFT information. Continuing conversation normally."
        );
    }

    #[test]
    fn completion_signal_is_gated_on_completeness() {
        let schema = user_schema();
        let partial = record_with(&schema, ExtractedFields::new().with("name", "Alice"));
        assert_eq!(completion_signal(&schema, &partial), "");

        let full = record_with(
            &schema,
            ExtractedFields::new()
                .with("name", "Alice")
                .with("location", "Paris")
                .with("occupation", "chef"),
        );
        let signal = completion_signal(&schema, &full);
        assert!(!signal.is_empty());
        assert_eq!(signal, schema.completion_directive);
    }
}
