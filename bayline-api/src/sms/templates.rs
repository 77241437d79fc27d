/// Template bodies, defined in source — never loaded from user
/// input. Each `{name}` placeholder must be present in the variable map
/// passed to `render`.
pub fn body(template: &str) -> Option<&'static str> {
    match template {
        "inspection_complete" => Some(
            "Hi {customer_name}, your {vehicle} inspection at {shop_name} is complete. View your report: {link}",
        ),
        "service_recommended" => Some(
            "Hi {customer_name}, we found items needing attention on your {vehicle}. Details: {link}",
        ),
        "appointment_reminder" => Some(
            "Reminder: your appointment at {shop_name} is on {date} at {time}. Reply STOP to opt out.",
        ),
        "thank_you" => Some(
            "Thanks for choosing {shop_name}, {customer_name}! We appreciate your business.",
        ),
        "follow_up" => Some(
            "Hi {customer_name}, just checking in on how your {vehicle} has been running since your visit to {shop_name}.",
        ),
        _ => None,
    }
}

pub const KNOWN_TEMPLATES: &[&str] = &[
    "inspection_complete",
    "service_recommended",
    "appointment_reminder",
    "thank_you",
    "follow_up",
];
