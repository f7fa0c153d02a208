use gloss_rs_protocol::{ModelDescriptor, SchemaDescriptor};
use serde_json::json;

/// Schema of the `Users` fixture: inline names on some fields, none on others.
pub fn users_schema() -> SchemaDescriptor {
    SchemaDescriptor::from_value(json!({
        "username": {
            "type": "String",
            "required": true,
            "minlength": 3,
            "maxlength": 100,
            "$name": "tên tài khoản",
        },
        "fullName": { "type": "String", "minlength": 3, "maxlength": 100 },
        "age": { "type": "Number", "min": 1, "max": 200, "$name": "tuổi" },
        "email": { "type": "String", "match": "^\\S+@\\S+$" },
        "role": { "type": "String", "enum": ["admin", "normal"], "$name": "quyền" },
        "birthday": { "type": "Date", "$name": "Sinh nhật" },
        "logs": [{ "time": { "type": "Date", "$name": "Thời gian truy cập" } }],
        "address": {
            "country": { "type": "String", "minlength": 2 },
            "street": { "type": "String", "minlength": 2 },
        },
    }))
    .unwrap_or_default()
}

/// The `Users` model backed by the `users` collection.
pub fn users_model() -> ModelDescriptor {
    ModelDescriptor::new("Users", users_schema()).with_collection("users")
}
