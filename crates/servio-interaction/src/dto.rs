//! Wire DTOs for the marketplace backend and their normalization.
//!
//! The backend is loose about shapes: list endpoints answer with either an
//! object wrapping the list or a bare array, decimals may arrive as strings,
//! and skills/categories come either as labels or as objects. Everything is
//! resolved here, once, into the domain types of `servio-core`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use servio_core::account::{AuthSession, ClientRegistrationForm, WorkerRegistrationForm};
use servio_core::category::Category;
use servio_core::error::ServioError;
use servio_core::field_errors::{FieldErrors, NON_FIELD_ERRORS};
use servio_core::serviceman::{
    AvailabilityStatistics, Candidate, CandidatePool, CategoryRef, normalize_rating,
    resolve_display_name,
};

// ============================================================================
// Servicemen
// ============================================================================

/// Every shape a serviceman list response may take.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ServicemenPayload {
    /// `{ "servicemen": [...], ... }` from the category endpoint
    Wrapped {
        servicemen: Vec<Value>,
        #[serde(default)]
        statistics: Option<Value>,
    },
    /// `{ "results": [...], "statistics": {...} }` from the listing endpoint
    Paged {
        results: Vec<Value>,
        #[serde(default)]
        statistics: Option<Value>,
    },
    /// `[...]`
    Bare(Vec<Value>),
    /// Anything else
    Unexpected(Value),
}

impl ServicemenPayload {
    pub fn from_value(value: Value) -> Self {
        // The catch-all variant makes this infallible in practice.
        serde_json::from_value(value.clone()).unwrap_or(Self::Unexpected(value))
    }

    /// Resolves the payload into a pool. Unexpected shapes become an empty
    /// pool and are logged.
    pub fn into_pool(self) -> CandidatePool {
        let (entries, statistics) = match self {
            Self::Wrapped {
                servicemen,
                statistics,
            } => (servicemen, statistics),
            Self::Paged {
                results,
                statistics,
            } => (results, statistics),
            Self::Bare(entries) => (entries, None),
            Self::Unexpected(value) => {
                tracing::warn!(
                    "Unexpected servicemen response shape ({}), treating as empty",
                    value_kind(&value)
                );
                return CandidatePool::default();
            }
        };

        let candidates = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<ServicemanDto>(entry) {
                Ok(dto) => Some(Candidate::from(dto)),
                Err(e) => {
                    tracing::warn!("Skipping malformed serviceman entry: {}", e);
                    None
                }
            })
            .collect();

        let mut pool = CandidatePool::new(candidates);
        if let Some(stats) = statistics.and_then(parse_statistics) {
            pool = pool.with_availability(stats);
        }
        pool
    }
}

/// Convenience for `ServicemenPayload::from_value(value).into_pool()`.
pub fn pool_from_value(value: Value) -> CandidatePool {
    ServicemenPayload::from_value(value).into_pool()
}

/// One serviceman entry. Only `id` is mandatory; every other field decodes
/// leniently and falls back to absent when its shape is off.
#[derive(Debug, Deserialize)]
pub struct ServicemanDto {
    pub id: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
    /// Some endpoints nest the account fields.
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<UserDto>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total_jobs_completed: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub years_of_experience: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<CategoryField>,
    #[serde(default, deserialize_with = "lenient_skills")]
    pub skills: Option<Vec<SkillField>>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_available: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserDto {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CategoryField {
    Id(u64),
    Name(String),
    Object {
        #[serde(default)]
        id: Option<u64>,
        #[serde(default)]
        name: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SkillField {
    Label(String),
    Object { name: String },
}

impl From<CategoryField> for CategoryRef {
    fn from(field: CategoryField) -> Self {
        match field {
            CategoryField::Id(id) => CategoryRef {
                id: Some(id),
                name: String::new(),
            },
            CategoryField::Name(name) => CategoryRef { id: None, name },
            CategoryField::Object { id, name } => CategoryRef {
                id,
                name: name.unwrap_or_default(),
            },
        }
    }
}

impl From<SkillField> for String {
    fn from(field: SkillField) -> Self {
        match field {
            SkillField::Label(label) => label,
            SkillField::Object { name } => name,
        }
    }
}

impl From<ServicemanDto> for Candidate {
    fn from(dto: ServicemanDto) -> Self {
        let user = dto.user.unwrap_or_default();
        let username = dto.username.or(user.username);
        let first_name = dto.first_name.or(user.first_name);
        let last_name = dto.last_name.or(user.last_name);
        let full_name = dto.full_name.or(user.full_name);

        let display_name = resolve_display_name(
            full_name.as_deref(),
            first_name.as_deref(),
            last_name.as_deref(),
            username.as_deref(),
        );

        Candidate {
            id: dto.id,
            display_name,
            username: username.unwrap_or_default(),
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            rating: normalize_rating(dto.rating),
            total_jobs_completed: dto.total_jobs_completed.unwrap_or(0),
            years_of_experience: dto.years_of_experience.unwrap_or(0),
            bio: dto.bio.unwrap_or_default(),
            category: dto.category.map(CategoryRef::from),
            skills: dto
                .skills
                .unwrap_or_default()
                .into_iter()
                .map(String::from)
                .collect(),
            is_available: dto.is_available,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatisticsDto {
    #[serde(default, deserialize_with = "lenient_u32")]
    total: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    available: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    busy: Option<u32>,
}

fn parse_statistics(value: Value) -> Option<AvailabilityStatistics> {
    match serde_json::from_value::<StatisticsDto>(value) {
        Ok(dto) => Some(AvailabilityStatistics {
            total: dto.total.unwrap_or(0),
            available: dto.available.unwrap_or(0),
            busy: dto.busy.unwrap_or(0),
        }),
        Err(e) => {
            tracing::warn!("Ignoring malformed statistics block: {}", e);
            None
        }
    }
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CategoryDto {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CategoryDto> for Category {
    fn from(dto: CategoryDto) -> Self {
        Category {
            id: dto.id,
            name: dto.name,
            description: dto.description.unwrap_or_default(),
        }
    }
}

/// Accepts a bare array or an object with `results`.
pub fn categories_from_value(value: Value) -> Vec<Category> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(entries)) => entries,
            _ => {
                tracing::warn!("Unexpected categories response shape (object), treating as empty");
                return Vec::new();
            }
        },
        other => {
            tracing::warn!(
                "Unexpected categories response shape ({}), treating as empty",
                value_kind(&other)
            );
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<CategoryDto>(entry) {
            Ok(dto) => Some(Category::from(dto)),
            Err(e) => {
                tracing::warn!("Skipping malformed category entry: {}", e);
                None
            }
        })
        .collect()
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "key", alias = "access")]
    pub token: String,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub user: Option<UserDto>,
}

impl From<LoginResponse> for AuthSession {
    fn from(response: LoginResponse) -> Self {
        let user = response.user.unwrap_or_default();
        AuthSession {
            token: response.token,
            user_id: response.user_id.or(user.id),
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClientRegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub phone_number: &'a str,
    pub password: &'a str,
    pub password2: &'a str,
}

impl<'a> From<&'a ClientRegistrationForm> for ClientRegisterRequest<'a> {
    fn from(form: &'a ClientRegistrationForm) -> Self {
        Self {
            username: form.username.trim(),
            email: form.email.trim(),
            first_name: form.first_name.trim(),
            last_name: form.last_name.trim(),
            phone_number: form.phone_number.trim(),
            password: &form.password,
            password2: &form.confirm_password,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WorkerRegisterRequest<'a> {
    #[serde(flatten)]
    pub account: ClientRegisterRequest<'a>,
    pub category: Option<u64>,
    pub years_of_experience: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub bio: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub skills: &'a [String],
}

impl<'a> From<&'a WorkerRegistrationForm> for WorkerRegisterRequest<'a> {
    fn from(form: &'a WorkerRegistrationForm) -> Self {
        Self {
            account: ClientRegisterRequest::from(&form.account),
            category: form.category_id,
            years_of_experience: form.years_of_experience,
            bio: form.bio.trim(),
            skills: &form.skills,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PasswordResetRequest<'a> {
    pub email: &'a str,
}

// ============================================================================
// Errors
// ============================================================================

/// Backend field names that differ from the form's.
const FIELD_RENAMES: &[(&str, &str)] = &[("password2", "confirm_password")];

/// Keys whose messages describe the request as a whole.
const GENERAL_KEYS: &[&str] = &[NON_FIELD_ERRORS, "detail", "error", "message"];

/// Maps a non-success response into a `ServioError`.
///
/// A 400 whose body is an object of field → messages becomes
/// `ServioError::Validation` with the messages kept verbatim; anything else
/// becomes `ServioError::Http` carrying the most useful message available.
pub fn map_http_error(status: u16, body: &str) -> ServioError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if status == 400 {
        if let Some(Value::Object(map)) = &parsed {
            let errors = field_errors_from_object(map);
            if !errors.is_empty() {
                return ServioError::Validation(errors);
            }
        }
    }

    let message = parsed
        .as_ref()
        .and_then(general_message)
        .unwrap_or_else(|| body.trim().to_string());

    ServioError::http(status, message)
}

fn field_errors_from_object(map: &serde_json::Map<String, Value>) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for (key, value) in map {
        let messages = messages_of(value);
        if messages.is_empty() {
            continue;
        }

        let field = if GENERAL_KEYS.contains(&key.as_str()) {
            NON_FIELD_ERRORS
        } else {
            FIELD_RENAMES
                .iter()
                .find(|(from, _)| *from == key.as_str())
                .map(|(_, to)| *to)
                .unwrap_or(key.as_str())
        };

        for message in messages {
            errors.add(field, message);
        }
    }

    errors
}

fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn general_message(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    GENERAL_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .flat_map(messages_of)
        .next()
}

// ============================================================================
// Lenient numeric decoding
// ============================================================================

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Decodes `T` if the value has its shape, otherwise yields `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_u64().and_then(|v| match v {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Keeps the skill entries that are a label or `{ "name": ... }`.
fn lenient_skills<'de, D>(deserializer: D) -> Result<Option<Vec<SkillField>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_entries() -> Value {
        json!([
            {
                "id": 1,
                "full_name": "Mario Rossi",
                "rating": "4.50",
                "total_jobs_completed": 12,
                "years_of_experience": 6,
                "category": {"id": 2, "name": "Plumbing"},
                "skills": [{"id": 1, "name": "Pipes"}, "Boilers"],
                "is_available": true
            },
            {
                "id": 2,
                "user": {"username": "lucy", "first_name": "Lucy", "last_name": ""},
                "rating": null,
                "bio": null
            }
        ])
    }

    #[test]
    fn test_bare_and_wrapped_shapes_normalize_identically() {
        let bare = pool_from_value(sample_entries());
        let wrapped =
            pool_from_value(json!({ "servicemen": sample_entries(), "category": {"id": 2} }));

        assert_eq!(bare.candidates, wrapped.candidates);
        assert_eq!(bare.candidates.len(), 2);
    }

    #[test]
    fn test_paged_shape_carries_statistics() {
        let pool = pool_from_value(json!({
            "results": sample_entries(),
            "statistics": {"total": 2, "available": 1, "busy": 1}
        }));

        assert_eq!(pool.candidates.len(), 2);
        assert_eq!(
            pool.availability,
            Some(AvailabilityStatistics {
                total: 2,
                available: 1,
                busy: 1
            })
        );
    }

    #[test]
    fn test_unexpected_shapes_become_empty() {
        for value in [json!({"detail": "ok"}), json!("servicemen"), json!(null), json!(42)] {
            let pool = pool_from_value(value);
            assert!(pool.is_empty());
            assert!(pool.availability.is_none());
        }
    }

    #[test]
    fn test_normalization_defaults_and_fallbacks() {
        let pool = pool_from_value(sample_entries());
        let mario = &pool.candidates[0];
        let lucy = &pool.candidates[1];

        assert_eq!(mario.display_name, "Mario Rossi");
        assert_eq!(mario.rating, 4.5);
        assert_eq!(mario.category_label(), "Plumbing");
        assert_eq!(mario.skills, vec!["Pipes", "Boilers"]);
        assert_eq!(mario.is_available, Some(true));

        assert_eq!(lucy.display_name, "Lucy");
        assert_eq!(lucy.username, "lucy");
        assert_eq!(lucy.rating, 0.0);
        assert_eq!(lucy.total_jobs_completed, 0);
        assert_eq!(lucy.years_of_experience, 0);
        assert_eq!(lucy.bio, "");
        assert!(lucy.category.is_none());
        assert!(lucy.skills.is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let pool = pool_from_value(json!([{"id": 1}, {"name": "no id"}, "junk", {"id": 3}]));
        let ids: Vec<u64> = pool.candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_odd_optional_fields_keep_the_entry() {
        let pool = pool_from_value(json!([
            {"id": 1, "skills": [3, 7]},
            {"id": 2, "is_available": "true"},
            {"id": 3},
            {"id": 4, "skills": ["tiling", {"name": "grouting"}, 9], "bio": 42},
            {"id": 5, "category": true, "user": "jd", "is_available": 0}
        ]));

        let ids: Vec<u64> = pool.candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(pool.candidates[0].skills.is_empty());
        assert_eq!(pool.candidates[1].is_available, Some(true));
        assert_eq!(pool.candidates[3].skills, vec!["tiling", "grouting"]);
        assert_eq!(pool.candidates[3].bio, "");
        assert_eq!(pool.candidates[4].category, None);
        assert_eq!(pool.candidates[4].is_available, Some(false));
    }

    #[test]
    fn test_category_field_shapes() {
        let pool = pool_from_value(json!([
            {"id": 1, "category": 7},
            {"id": 2, "category": "Cleaning"}
        ]));
        assert_eq!(
            pool.candidates[0].category,
            Some(CategoryRef {
                id: Some(7),
                name: String::new()
            })
        );
        assert_eq!(pool.candidates[1].category_label(), "Cleaning");
    }

    #[test]
    fn test_categories_shapes() {
        let list = json!([{"id": 1, "name": "Plumbing", "description": null}]);
        assert_eq!(categories_from_value(list.clone()).len(), 1);
        assert_eq!(categories_from_value(json!({ "results": list })).len(), 1);
        assert!(categories_from_value(json!({"count": 0})).is_empty());
    }

    #[test]
    fn test_field_errors_are_kept_verbatim() {
        let body = json!({
            "email": ["user with this email already exists."],
            "password2": ["Password fields didn't match."],
            "non_field_errors": ["Registration closed."]
        })
        .to_string();
        let err = map_http_error(400, &body);

        let fields = err.field_errors().expect("validation error");
        assert_eq!(fields.get("email"), ["user with this email already exists."]);
        assert_eq!(fields.get("confirm_password"), ["Password fields didn't match."]);
        assert_eq!(fields.get(NON_FIELD_ERRORS), ["Registration closed."]);
        assert!(fields.summary().starts_with("Registration closed."));
    }

    #[test]
    fn test_non_validation_errors_keep_detail() {
        let err = map_http_error(401, r#"{"detail": "Invalid credentials."}"#);
        assert!(matches!(
            err,
            ServioError::Http { status: 401, ref message } if message == "Invalid credentials."
        ));

        let err = map_http_error(500, "Internal Server Error");
        assert!(matches!(
            err,
            ServioError::Http { status: 500, ref message } if message == "Internal Server Error"
        ));
    }

    #[test]
    fn test_login_response_aliases() {
        let response: LoginResponse =
            serde_json::from_value(json!({"key": "abc", "user": {"id": 4, "username": "jd"}}))
                .unwrap();
        let session = AuthSession::from(response);
        assert_eq!(session.token, "abc");
        assert_eq!(session.user_id, Some(4));
        assert_eq!(session.username.as_deref(), Some("jd"));
    }

    #[test]
    fn test_worker_request_flattens_account_fields() {
        let form = WorkerRegistrationForm {
            account: ClientRegistrationForm {
                username: " jd ".to_string(),
                password: "pw123456".to_string(),
                confirm_password: "pw123456".to_string(),
                ..Default::default()
            },
            category_id: Some(3),
            years_of_experience: 4,
            ..Default::default()
        };

        let value = serde_json::to_value(WorkerRegisterRequest::from(&form)).unwrap();
        assert_eq!(value["username"], "jd");
        assert_eq!(value["password2"], "pw123456");
        assert_eq!(value["category"], 3);
        assert!(value.get("skills").is_none());
        assert!(value.get("phone_number").is_none());
    }
}
