use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::users::dto::UserPayload;

// The row projection the API serves. The table also carries `password`
// (Argon2 hash), `active` and `deleted_at`; those stay in SQL and never
// cross into a response.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, address, phone, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, address, phone, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    // The store assigns `id` and `created_at`; `payload.password` is
    // ignored in favor of the hash.
    pub async fn create(
        db: &PgPool,
        payload: &UserPayload,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password, name, address, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, name, address, phone, created_at
            "#,
        )
        .bind(&payload.email)
        .bind(password_hash)
        .bind(&payload.name)
        .bind(&payload.address)
        .bind(&payload.phone)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    // Full replace of the writable columns. Zero rows means the id does
    // not exist; a missing row is never inserted here.
    pub async fn update(
        db: &PgPool,
        id: i64,
        payload: &UserPayload,
        password_hash: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $2, password = $3, name = $4, address = $5, phone = $6
            WHERE id = $1
            RETURNING id, email, name, address, phone, created_at
            "#,
        )
        .bind(id)
        .bind(&payload.email)
        .bind(password_hash)
        .bind(&payload.name)
        .bind(&payload.address)
        .bind(&payload.phone)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            DELETE FROM users
            WHERE id = $1
            RETURNING id, email, name, address, phone, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: 1,
            email: "a@b.com".into(),
            name: "A".into(),
            address: "".into(),
            phone: "".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn hidden_columns_stay_out_of_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("active").is_none());
        assert!(json.get("deleted_at").is_none());
    }

    #[test]
    fn wire_fields_are_present() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 6);
        assert_eq!(json["id"], 1);
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["name"], "A");
        assert_eq!(json["address"], "");
        assert_eq!(json["phone"], "");
        let created_at = json["created_at"].as_str().unwrap();
        assert!(created_at.starts_with("1970-01-01T00:00:00"));
    }

    // The tests below need a live Postgres that may create databases:
    // `DATABASE_URL=... cargo test -- --ignored`.

    #[sqlx::test]
    #[ignore]
    async fn create_then_find_round_trips(pool: PgPool) {
        let payload = UserPayload {
            email: "ada@acme.dev".into(),
            name: "Ada".into(),
            address: "12 Crescent".into(),
            phone: "555-0100".into(),
            ..Default::default()
        };
        let created = User::create(&pool, &payload, "argon2-hash").await.unwrap();
        assert!(created.id >= 1);
        assert_eq!(created.email, "ada@acme.dev");
        assert_eq!(created.name, "Ada");
        assert_eq!(created.address, "12 Crescent");
        assert_eq!(created.phone, "555-0100");

        let found = User::find_by_id(&pool, created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[sqlx::test]
    #[ignore]
    async fn replace_zero_fills_omitted_fields(pool: PgPool) {
        let initial = UserPayload {
            email: "ada@acme.dev".into(),
            name: "Ada".into(),
            address: "12 Crescent".into(),
            ..Default::default()
        };
        let created = User::create(&pool, &initial, "hash-one").await.unwrap();

        let replacement = UserPayload {
            email: "ada@lovelace.dev".into(),
            ..Default::default()
        };
        let updated = User::update(&pool, created.id, &replacement, "hash-two")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.email, "ada@lovelace.dev");
        assert_eq!(updated.name, "");
        assert_eq!(updated.address, "");
        assert_eq!(updated.created_at, created.created_at);

        let found = User::find_by_id(&pool, created.id).await.unwrap();
        assert_eq!(found, Some(updated));
    }

    #[sqlx::test]
    #[ignore]
    async fn missing_ids_touch_no_rows(pool: PgPool) {
        assert_eq!(User::find_by_id(&pool, 4096).await.unwrap(), None);
        assert_eq!(
            User::update(&pool, 4096, &UserPayload::default(), "hash")
                .await
                .unwrap(),
            None
        );
        assert_eq!(User::delete(&pool, 4096).await.unwrap(), None);
    }

    #[sqlx::test]
    #[ignore]
    async fn delete_hands_back_the_prior_row(pool: PgPool) {
        let payload = UserPayload {
            email: "gone@acme.dev".into(),
            ..Default::default()
        };
        let created = User::create(&pool, &payload, "hash").await.unwrap();

        let deleted = User::delete(&pool, created.id).await.unwrap();
        assert_eq!(deleted, Some(created.clone()));
        assert_eq!(User::find_by_id(&pool, created.id).await.unwrap(), None);
    }
}
