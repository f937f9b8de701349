/// Strict switch parsing: only `"true"` and `"1"` turn a flag on.
pub fn is_enabled_flag(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true") | Some("1"))
}
