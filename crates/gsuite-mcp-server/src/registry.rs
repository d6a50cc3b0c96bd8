//! Static tool declarations.
//!
//! Every tool the server exposes via `tools/list`, with its JSON Schema.
//! The schemas are what the calling agent sees; keep descriptions short and
//! concrete.

use serde_json::json;

use gsuite_mcp_protocol::ToolDescriptor;

/// Returns the descriptors for all exposed tools.
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "list_events".to_string(),
            description: "List calendar events for a time range".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "time_range": {
                        "type": "string",
                        "enum": ["today", "tomorrow", "this_week", "next_week", "custom"],
                        "description": "Which period to list",
                        "default": "today"
                    },
                    "start_date": {
                        "type": "string",
                        "description": "Start date (YYYY-MM-DD), required for custom range"
                    },
                    "end_date": {
                        "type": "string",
                        "description": "End date (YYYY-MM-DD), required for custom range"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of events to return",
                        "default": 10
                    }
                }
            }),
        },
        ToolDescriptor {
            name: "search_events".to_string(),
            description: "Search calendar events by title, description or location"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Free-text search query"
                    },
                    "days_ahead": {
                        "type": "integer",
                        "description": "How many days ahead to search",
                        "default": 30
                    },
                    "max_results": {
                        "type": "integer",
                        "default": 10
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDescriptor {
            name: "create_event".to_string(),
            description: "Create a calendar event".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "summary": {
                        "type": "string",
                        "description": "Event title"
                    },
                    "start_time": {
                        "type": "string",
                        "description": "Start time (RFC 3339 or 'YYYY-MM-DD HH:MM')"
                    },
                    "end_time": {
                        "type": "string",
                        "description": "End time (RFC 3339 or 'YYYY-MM-DD HH:MM')"
                    },
                    "description": {
                        "type": "string"
                    },
                    "location": {
                        "type": "string"
                    },
                    "attendees": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Attendee email addresses"
                    }
                },
                "required": ["summary", "start_time", "end_time"]
            }),
        },
        ToolDescriptor {
            name: "delete_event".to_string(),
            description: "Delete a calendar event by id".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "event_id": {
                        "type": "string",
                        "description": "The event id, as shown by list_events"
                    }
                },
                "required": ["event_id"]
            }),
        },
        ToolDescriptor {
            name: "find_free_slots".to_string(),
            description: "Find free time slots in the calendar".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "duration_minutes": {
                        "type": "integer",
                        "description": "Minimum slot length in minutes",
                        "default": 60
                    },
                    "days_ahead": {
                        "type": "integer",
                        "description": "How many days ahead to scan",
                        "default": 7
                    },
                    "work_hours_only": {
                        "type": "boolean",
                        "description": "Only report slots starting within work hours",
                        "default": true
                    }
                }
            }),
        },
        ToolDescriptor {
            name: "search_emails".to_string(),
            description: "Search Gmail messages with a Gmail query string".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Gmail search query, e.g. 'from:alice is:unread'"
                    },
                    "max_results": {
                        "type": "integer",
                        "default": 10
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDescriptor {
            name: "read_email".to_string(),
            description: "Read a Gmail message, including its text body".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message_id": {
                        "type": "string",
                        "description": "The message id, as shown by search_emails"
                    }
                },
                "required": ["message_id"]
            }),
        },
        ToolDescriptor {
            name: "send_email".to_string(),
            description: "Send a plain-text email".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "to": {
                        "type": "string",
                        "description": "Recipient address"
                    },
                    "subject": {
                        "type": "string"
                    },
                    "body": {
                        "type": "string"
                    },
                    "cc": {
                        "type": "string",
                        "description": "Optional Cc address"
                    }
                },
                "required": ["to", "subject", "body"]
            }),
        },
        ToolDescriptor {
            name: "reply_email".to_string(),
            description: "Reply to a Gmail message, keeping the thread".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message_id": {
                        "type": "string",
                        "description": "The message to reply to"
                    },
                    "body": {
                        "type": "string",
                        "description": "Reply text"
                    }
                },
                "required": ["message_id", "body"]
            }),
        },
        ToolDescriptor {
            name: "delete_email".to_string(),
            description: "Move a Gmail message to the trash".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message_id": {
                        "type": "string"
                    }
                },
                "required": ["message_id"]
            }),
        },
        ToolDescriptor {
            name: "label_email".to_string(),
            description: "Add or remove labels on a Gmail message".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message_id": {
                        "type": "string"
                    },
                    "add_labels": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Label ids to add, e.g. STARRED"
                    },
                    "remove_labels": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Label ids to remove, e.g. UNREAD"
                    }
                },
                "required": ["message_id"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tools_are_declared() {
        let names: Vec<_> = tool_descriptors().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "list_events",
                "search_events",
                "create_event",
                "delete_event",
                "find_free_slots",
                "search_emails",
                "read_email",
                "send_email",
                "reply_email",
                "delete_email",
                "label_email",
            ]
        );
    }

    #[test]
    fn schemas_are_objects_with_properties() {
        for tool in tool_descriptors() {
            assert_eq!(tool.input_schema["type"], "object", "tool {}", tool.name);
            assert!(
                tool.input_schema["properties"].is_object(),
                "tool {}",
                tool.name
            );
            assert!(!tool.description.is_empty());
        }
    }

    #[test]
    fn required_fields_exist_in_properties() {
        for tool in tool_descriptors() {
            let Some(required) = tool.input_schema.get("required") else {
                continue;
            };
            for field in required.as_array().unwrap() {
                let field = field.as_str().unwrap();
                assert!(
                    tool.input_schema["properties"].get(field).is_some(),
                    "tool {} requires undeclared field {}",
                    tool.name,
                    field
                );
            }
        }
    }
}
