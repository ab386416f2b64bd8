use std::collections::HashSet;

use sqlx::{types::Json, PgPool};

use crate::domain::company::Company;

/// Writes one document per company keyed by its id. Returns whether a row was
/// written; with `skip_existing` an already stored company is left untouched.
pub async fn upsert_company(
    pool: &PgPool,
    company: &Company,
    skip_existing: bool,
) -> Result<bool, sqlx::Error> {
    let query = match skip_existing {
        true => {
            r"
            insert into company
                (id, document)
            values
                ($1, $2)
            on conflict(id) do nothing
            "
        }
        false => {
            r"
            insert into company
                (id, document)
            values
                ($1, $2)
            on conflict(id) do update set
                document = excluded.document,
                updated_at = now()
            "
        }
    };

    let result = sqlx::query(query)
        .bind(company.id())
        .bind(Json(company))
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_all_companies(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
    let documents: Vec<Json<Company>> = sqlx::query_scalar(
        r"
        select
            document
        from
            company
        order by id
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(documents.into_iter().map(|Json(c)| c).collect())
}

pub async fn get_companies_by_ids(
    pool: &PgPool,
    ids: &[String],
) -> Result<Vec<Company>, sqlx::Error> {
    let documents: Vec<Json<Company>> = sqlx::query_scalar(
        r"
        select
            document
        from
            company
        where
            id = any($1)
        ",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(documents.into_iter().map(|Json(c)| c).collect())
}

pub async fn get_existing_company_ids(
    pool: &PgPool,
    ids: &[String],
) -> Result<HashSet<String>, sqlx::Error> {
    let existing: Vec<String> = sqlx::query_scalar(
        r"
        select
            id
        from
            company
        where
            id = any($1)
        ",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(HashSet::from_iter(existing))
}
