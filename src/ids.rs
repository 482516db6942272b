use rand::Rng;
use time::OffsetDateTime;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_SUFFIX_LEN: usize = 11;

/// Millisecond timestamp in base 36 followed by random base-36 characters.
/// Collision-resistant in practice, not guaranteed unique.
pub fn generate_id() -> String {
    let millis = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).max(0) as u128;
    let mut id = to_base36(millis);

    let mut rng = rand::thread_rng();
    id.extend((0..RANDOM_SUFFIX_LEN).map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char));
    id
}

fn to_base36(mut n: u128) -> String {
    if n == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
