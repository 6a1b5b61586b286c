pub fn overview_key(user_id: &str) -> String {
    format!("overview:{}", user_id)
}
