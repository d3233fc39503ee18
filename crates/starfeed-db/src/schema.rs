diesel::table! {
    kv_store (key) {
        key -> Text,
        value -> Binary,
        updated_at -> Text,
    }
}
