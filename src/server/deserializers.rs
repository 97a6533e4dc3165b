use serde::{Deserialize, Deserializer};

// the page number comes from the query string, anything that is not an integer is
// treated as if it was not sent at all
pub fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|value| value.trim().parse::<i64>().ok()))
}
