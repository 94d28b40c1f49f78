use crate::utils::combos::exclude_names;
use chrono::{Days, Utc};
use rand::Rng;
use serde_json::Value;
use uuid::Uuid;

pub type InputFn = fn() -> Value;

/// The fuzzing vocabulary: every generator brute force can assign to a
/// field or argument. `long_*` variants are excluded from generation by
/// default but remain resolvable for imported task files.
const INPUT_METHODS: &[(&str, InputFn)] = &[
    ("alpha", gen_alpha),
    ("alphanumeric", gen_alphanumeric),
    ("numeric", gen_numeric),
    ("utf8", gen_utf8),
    ("html", gen_html),
    ("integer", gen_integer),
    ("negative_integer", gen_negative_integer),
    ("boolean", gen_boolean),
    ("email", gen_email),
    ("url", gen_url),
    ("uuid", gen_uuid),
    ("ipaddr", gen_ipaddr),
    ("macaddr", gen_macaddr),
    ("date", gen_date),
    ("long_alpha", gen_long_alpha),
    ("long_utf8", gen_long_utf8),
];

pub fn input_methods() -> &'static [(&'static str, InputFn)] {
    INPUT_METHODS
}

pub fn input_names(exclude: Option<&[String]>) -> Vec<String> {
    let names = INPUT_METHODS
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    exclude_names(names, exclude)
}

/// Resolves a generator name to a concrete value. Unknown names pass
/// through as literal strings so imported tasks can pin exact values.
pub fn generate(name: &str) -> Value {
    INPUT_METHODS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, f)| f())
        .unwrap_or_else(|| Value::String(name.to_string()))
}

fn random_alpha(len: usize, lowercase: bool) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| {
            let c = (b'a' + rng.gen_range(0..26)) as char;
            if !lowercase && rng.gen_bool(0.5) {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

fn gen_alpha() -> Value {
    Value::String(random_alpha(10, false))
}

fn gen_alphanumeric() -> Value {
    let mut rng = rand::thread_rng();
    let s: String = (0..10)
        .map(|_| {
            if rng.gen_bool(0.3) {
                (b'0' + rng.gen_range(0..10)) as char
            } else {
                (b'a' + rng.gen_range(0..26)) as char
            }
        })
        .collect();
    Value::String(s)
}

fn gen_numeric() -> Value {
    let mut rng = rand::thread_rng();
    let s: String = (0..8).map(|_| (b'0' + rng.gen_range(0..10)) as char).collect();
    Value::String(s)
}

fn gen_utf8() -> Value {
    let mut rng = rand::thread_rng();
    let s: String = (0..10)
        .map(|_| char::from_u32(rng.gen_range(0x4E00..0x9FFF)).unwrap_or('字'))
        .collect();
    Value::String(s)
}

fn gen_html() -> Value {
    Value::String(format!("<p>{}</p>", random_alpha(10, false)))
}

fn gen_integer() -> Value {
    let mut rng = rand::thread_rng();
    Value::Number(rng.gen_range(0..100_000i64).into())
}

fn gen_negative_integer() -> Value {
    let mut rng = rand::thread_rng();
    Value::Number((-rng.gen_range(1..100_000i64)).into())
}

fn gen_boolean() -> Value {
    Value::Bool(rand::thread_rng().gen_bool(0.5))
}

fn gen_email() -> Value {
    Value::String(format!(
        "{}@{}.example.com",
        random_alpha(8, true),
        random_alpha(6, true)
    ))
}

fn gen_url() -> Value {
    Value::String(format!(
        "https://{}.example.com/{}",
        random_alpha(8, true),
        random_alpha(5, true)
    ))
}

fn gen_uuid() -> Value {
    Value::String(Uuid::new_v4().to_string())
}

fn gen_ipaddr() -> Value {
    let mut rng = rand::thread_rng();
    Value::String(format!(
        "{}.{}.{}.{}",
        rng.gen_range(1..255),
        rng.gen_range(0..256),
        rng.gen_range(0..256),
        rng.gen_range(1..255)
    ))
}

fn gen_macaddr() -> Value {
    let mut rng = rand::thread_rng();
    let parts: Vec<String> = (0..6).map(|_| format!("{:02x}", rng.gen_range(0..256))).collect();
    Value::String(parts.join(":"))
}

fn gen_date() -> Value {
    let mut rng = rand::thread_rng();
    let today = Utc::now().date_naive();
    let date = today
        .checked_sub_days(Days::new(rng.gen_range(0..3650)))
        .unwrap_or(today);
    Value::String(date.to_string())
}

fn gen_long_alpha() -> Value {
    Value::String(random_alpha(1000, false))
}

fn gen_long_utf8() -> Value {
    let mut rng = rand::thread_rng();
    let s: String = (0..1000)
        .map(|_| char::from_u32(rng.gen_range(0x4E00..0x9FFF)).unwrap_or('字'))
        .collect();
    Value::String(s)
}
