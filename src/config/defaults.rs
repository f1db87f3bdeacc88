pub fn default_direct_timeout_ms() -> u64 {
    3000
}

pub fn default_relay_timeout_secs() -> u64 {
    30
}

pub fn default_collapse_thinking() -> bool {
    false
}

pub fn default_resegment_escaped() -> bool {
    true // decoded escapes get their spans split out too
}
