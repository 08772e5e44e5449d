/// 32-bit rolling hash over UTF-16 code units: `hash = hash * 31 + unit`,
/// wrapping to the signed range at every step.
pub fn id_hash(id: &str) -> i32 {
    id.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}
