/// Keeps the first `max_chars` characters of `value`, appending `marker` only
/// when something was cut. Counts `char`s, so multi-byte text never splits.
pub fn truncate_chars(value: &str, max_chars: usize, marker: &str) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{marker}", &value[..cut]),
        None => value.to_string(),
    }
}
