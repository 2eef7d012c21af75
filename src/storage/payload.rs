//! Normalization of remote payloads
//!
//! The wallet API is not consistent about field names (`concepto` vs
//! `concept`, `user_id` vs `ownerId`, numeric vs string ids, the user object
//! nested under `user`, `usuario` or not at all). Everything is mapped to the
//! canonical [`Movement`] and [`Session`] shapes here, once, so nothing past
//! this module has to guess.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use crate::models::{Money, Movement, MovementId, MovementType, Session, User, UserId};

use super::remote::RemoteError;

type Object = Map<String, Value>;

fn field<'a>(obj: &'a Object, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|value| !value.is_null())
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_from(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 => Some(format!("{}", f as i64)),
            _ => Some(n.to_string()),
        },
        other => text(other),
    }
}

/// Amounts beyond [`Money::MAX`] are treated as unreadable
fn money_from(value: &Value) -> Option<Money> {
    let amount = match value {
        Value::Number(n) => n.as_f64().and_then(Money::from_f64),
        Value::String(s) => Money::parse(s).ok(),
        _ => None,
    }?;
    amount.is_within_limit().then_some(amount)
}

/// Parse the date forms the API has been seen to send
///
/// RFC 3339 timestamps, naive `YYYY-MM-DD[ HH:MM:SS]` (taken as UTC) and
/// epoch milliseconds. Anything else is treated as absent.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(Utc.from_utc_datetime(&naive));
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

/// Map one remote movement object into the canonical shape
///
/// Returns `None` for values that are not objects at all.
pub fn normalize_movement(value: &Value) -> Option<Movement> {
    let obj = value.as_object()?;

    let id = match field(obj, &["id", "_id"]).and_then(id_from) {
        Some(id) => MovementId::from(id),
        None => {
            warn!("Remote movement without id, assigning a local one");
            MovementId::new()
        }
    };

    let concept = field(obj, &["concept", "concepto", "description"])
        .and_then(text)
        .unwrap_or_default();

    let amount = match field(obj, &["amount", "monto"]).and_then(money_from) {
        Some(amount) if amount.is_negative() => {
            warn!(%id, %amount, "Negative remote amount, using its magnitude");
            amount.abs()
        }
        Some(amount) => amount,
        None => {
            warn!(%id, "Remote movement without a usable amount, counting it as zero");
            Money::zero()
        }
    };

    let movement_type = match field(obj, &["type", "tipo"]).and_then(text) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(%id, kind = %raw, "Unknown movement type, treating it as an expense");
            MovementType::Expense
        }),
        None => MovementType::Expense,
    };

    let date = field(obj, &["date", "fecha", "created_at", "createdAt"]).and_then(parse_date);

    let full_amount = field(obj, &["fullAmount", "full_amount"])
        .and_then(money_from)
        .filter(|full| *full != amount);

    Some(Movement {
        id,
        concept,
        amount,
        movement_type,
        date,
        owner_id: field(obj, &["ownerId", "user_id", "userId"])
            .and_then(id_from)
            .map(UserId::from),
        full_amount,
        shared_with_id: field(obj, &["sharedWithId", "shared_with_id"])
            .and_then(id_from)
            .map(UserId::from),
        paid_by_name: field(obj, &["paidByName", "paid_by_name", "pagado_por"]).and_then(text),
    })
}

/// Map a movement list response
///
/// Accepts a bare array or an object wrapping one under `movements`,
/// `movimientos` or `data`.
pub fn normalize_movement_list(value: &Value) -> Result<Vec<Movement>, RemoteError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) => match field(obj, &["movements", "movimientos", "data"]) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(RemoteError::Parse(
                    "expected a list of movements".to_string(),
                ))
            }
        },
        _ => {
            return Err(RemoteError::Parse(
                "expected a list of movements".to_string(),
            ))
        }
    };

    let mut movements = Vec::with_capacity(items.len());
    for item in items {
        match normalize_movement(item) {
            Some(movement) => movements.push(movement),
            None => warn!("Skipping non-object entry in movement list"),
        }
    }
    Ok(movements)
}

fn normalize_user(obj: &Object) -> Result<User, RemoteError> {
    let id = field(obj, &["id", "_id", "user_id"])
        .and_then(id_from)
        .ok_or_else(|| RemoteError::Parse("login response has no user id".to_string()))?;

    let email = field(obj, &["email", "correo"]).and_then(text);
    let name = field(obj, &["name", "nombre", "username"])
        .and_then(text)
        .or_else(|| email.clone())
        .unwrap_or_else(|| id.clone());

    Ok(User {
        id: UserId::from(id),
        name,
        email,
    })
}

/// Map a login response into a session
///
/// The user may sit under `user`, `usuario`, or be the response itself; the
/// token under `token`, `accessToken` or `jwt`. No token means no session.
pub fn normalize_login(value: &Value) -> Result<Session, RemoteError> {
    let root = value
        .as_object()
        .ok_or_else(|| RemoteError::Parse("login response is not an object".to_string()))?;

    let token = field(root, &["token", "accessToken", "jwt"])
        .and_then(text)
        .ok_or(RemoteError::MissingToken)?;

    let user_obj = match field(root, &["user", "usuario"]) {
        Some(Value::Object(user)) => user,
        _ => root,
    };

    Ok(Session::authenticated(normalize_user(user_obj)?, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde_json::json;

    #[test]
    fn test_source_field_names() {
        let mov = normalize_movement(&json!({
            "id": 17,
            "concepto": "Cena",
            "monto": "45.5",
            "tipo": "gasto",
            "fecha": "2026-10-02T20:15:00Z",
            "user_id": 3,
            "full_amount": 91,
            "shared_with_id": "4",
            "pagado_por": "Luis"
        }))
        .unwrap();

        assert_eq!(mov.id, MovementId::from("17"));
        assert_eq!(mov.concept, "Cena");
        assert_eq!(mov.amount, Money::from_cents(4550));
        assert_eq!(mov.movement_type, MovementType::Expense);
        assert_eq!(mov.date.unwrap().day(), 2);
        assert_eq!(mov.owner_id, Some(UserId::from("3")));
        assert_eq!(mov.full_amount, Some(Money::from_cents(9100)));
        assert_eq!(mov.shared_with_id, Some(UserId::from("4")));
        assert_eq!(mov.paid_by_name.as_deref(), Some("Luis"));
    }

    #[test]
    fn test_canonical_field_names() {
        let mov = normalize_movement(&json!({
            "id": "m-1",
            "concept": "Salary",
            "amount": 1200,
            "type": "income",
            "date": "2026-10-01",
            "ownerId": "u-1",
            "fullAmount": 1200
        }))
        .unwrap();

        assert!(mov.is_income());
        assert_eq!(mov.amount, Money::from_cents(120000));
        assert_eq!(mov.full_amount, None);
        assert_eq!(mov.date.unwrap().month(), 10);
    }

    #[test]
    fn test_bad_amount_and_date_degrade() {
        let mov = normalize_movement(&json!({
            "id": "x",
            "concept": "???",
            "amount": "lots",
            "type": "ingreso",
            "date": "not a date"
        }))
        .unwrap();

        assert_eq!(mov.amount, Money::zero());
        assert_eq!(mov.date, None);
    }

    #[test]
    fn test_oversized_amount_counts_as_zero() {
        let mov = normalize_movement(&json!({
            "id": "big",
            "concept": "typo",
            "amount": 9.0e16,
            "fullAmount": "90000000000000000",
            "type": "income"
        }))
        .unwrap();

        assert_eq!(mov.amount, Money::zero());
        assert_eq!(mov.full_amount, None);
        assert!(mov.validate().is_ok());
    }

    #[test]
    fn test_epoch_millis_date() {
        let date = parse_date(&json!(1_790_000_000_000i64)).unwrap();
        assert_eq!(date.timestamp_millis(), 1_790_000_000_000);
        assert_eq!(parse_date(&json!(true)), None);
    }

    #[test]
    fn test_list_shapes() {
        let bare = normalize_movement_list(&json!([{ "id": 1, "amount": 1, "type": "income" }, 5]))
            .unwrap();
        assert_eq!(bare.len(), 1);

        let wrapped =
            normalize_movement_list(&json!({ "movimientos": [{ "id": 1 }, { "id": 2 }] })).unwrap();
        assert_eq!(wrapped.len(), 2);

        assert!(normalize_movement_list(&json!({ "error": "nope" })).is_err());
    }

    #[test]
    fn test_login_variants() {
        let nested = normalize_login(&json!({
            "usuario": { "id": 5, "name": "Ana", "email": "ana@example.com" },
            "accessToken": "t-1"
        }))
        .unwrap();
        assert_eq!(nested.user.id, UserId::from("5"));
        assert_eq!(nested.user.name, "Ana");
        assert_eq!(nested.token.as_deref(), Some("t-1"));

        let flat = normalize_login(&json!({ "id": "u9", "email": "bo@example.com", "jwt": "t-2" }))
            .unwrap();
        assert_eq!(flat.user.name, "bo@example.com");
        assert_eq!(flat.token.as_deref(), Some("t-2"));
    }

    #[test]
    fn test_login_without_token_fails() {
        let err = normalize_login(&json!({ "user": { "id": 1, "name": "Ana" } })).unwrap_err();
        assert!(matches!(err, RemoteError::MissingToken));
    }
}
