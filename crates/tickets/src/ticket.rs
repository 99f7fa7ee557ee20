use serde::{Deserialize, Serialize};

/// Snapshot of one remote ticket at fetch time.
///
/// Every attribute is optional on the wire: the server omits a field rather
/// than sending `null` when it is empty or zero, and the same convention is
/// kept on the encode side. Timestamps are carried as the opaque ISO-8601
/// strings the server returns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitter_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collaborator_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sharing_agreement_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forum_topic_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_incidents: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<Via>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction_rating: Option<SatisfactionRating>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
}

/// Channel a ticket was created through.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Via {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SatisfactionRating {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One per-account custom field on a ticket.
///
/// Field types are defined per account on the remote, so the value slot is
/// heterogeneous: string, integer, boolean, or `null`/absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: u64,
    #[serde(default)]
    pub value: Option<CustomFieldValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomFieldValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl CustomField {
    /// The string value, or `""` when the stored value is absent or not a
    /// string. A zero value means "not present", not a trustworthy empty
    /// string; callers that need the distinction should match on `value`.
    pub fn string_val(&self) -> String {
        match &self.value {
            Some(CustomFieldValue::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    /// The integer value, or `0` on absence or type mismatch.
    pub fn int_val(&self) -> i64 {
        match self.value {
            Some(CustomFieldValue::Integer(i)) => i,
            _ => 0,
        }
    }

    /// The boolean value, or `false` on absence or type mismatch.
    pub fn bool_val(&self) -> bool {
        match self.value {
            Some(CustomFieldValue::Boolean(b)) => b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_field_accessors() {
        let field: CustomField = serde_json::from_value(serde_json::json!({
            "id": 20321483,
            "value": "745"
        }))
        .unwrap();

        assert_eq!(field.string_val(), "745");
        assert_eq!(field.int_val(), 0);
        assert!(!field.bool_val());
    }

    #[test]
    fn test_integer_field_accessors() {
        let field: CustomField = serde_json::from_value(serde_json::json!({
            "id": 20321484,
            "value": 745
        }))
        .unwrap();

        assert_eq!(field.int_val(), 745);
        assert_eq!(field.string_val(), "");
        assert!(!field.bool_val());
    }

    #[test]
    fn test_boolean_field_accessors() {
        let field: CustomField = serde_json::from_value(serde_json::json!({
            "id": 20321485,
            "value": true
        }))
        .unwrap();

        assert!(field.bool_val());
        assert_eq!(field.string_val(), "");
        assert_eq!(field.int_val(), 0);
    }

    #[test]
    fn test_null_and_missing_values_decode_to_none() {
        let null_value: CustomField =
            serde_json::from_value(serde_json::json!({"id": 1, "value": null})).unwrap();
        let missing_value: CustomField =
            serde_json::from_value(serde_json::json!({"id": 1})).unwrap();

        for field in [null_value, missing_value] {
            assert_eq!(field.value, None);
            assert_eq!(field.string_val(), "");
            assert_eq!(field.int_val(), 0);
            assert!(!field.bool_val());
        }
    }

    #[test]
    fn test_ticket_decodes_with_all_fields_omitted() {
        let ticket: Ticket = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(ticket, Ticket::default());
        assert!(ticket.tags.is_empty());
        assert!(ticket.custom_fields.is_empty());
    }

    #[test]
    fn test_ticket_decodes_partial_payload() {
        let ticket: Ticket = serde_json::from_value(serde_json::json!({
            "id": 35436,
            "subject": "Help, my printer is on fire!",
            "type": "incident",
            "tags": ["enterprise", "other_tag"],
            "via": {"channel": "web"},
            "satisfaction_rating": {"id": 62, "score": "good"},
            "custom_fields": [
                {"id": 27642, "value": "745"},
                {"id": 27648, "value": true}
            ]
        }))
        .unwrap();

        assert_eq!(ticket.id, Some(35436));
        assert_eq!(ticket.ticket_type.as_deref(), Some("incident"));
        assert_eq!(ticket.tags, vec!["enterprise", "other_tag"]);
        assert_eq!(ticket.via.unwrap().channel.as_deref(), Some("web"));
        assert_eq!(
            ticket.satisfaction_rating.unwrap().score.as_deref(),
            Some("good")
        );
        assert_eq!(ticket.custom_fields[0].string_val(), "745");
        assert!(ticket.custom_fields[1].bool_val());
        assert_eq!(ticket.status, None);
        assert_eq!(ticket.requester_id, None);
    }

    #[test]
    fn test_encode_omits_empty_fields() {
        let ticket = Ticket {
            id: Some(1),
            subject: Some("a".to_string()),
            ..Default::default()
        };

        let encoded = serde_json::to_value(&ticket).unwrap();
        assert_eq!(encoded, serde_json::json!({"id": 1, "subject": "a"}));
    }

    #[test]
    fn test_ticket_type_uses_wire_name() {
        let ticket = Ticket {
            ticket_type: Some("question".to_string()),
            ..Default::default()
        };

        let encoded = serde_json::to_value(&ticket).unwrap();
        assert_eq!(encoded, serde_json::json!({"type": "question"}));
    }
}
