//! Seeds the question graph from CSV exports.
//!
//! Reads `categories.csv`, `questions.csv`, `options.csv` and `blocks.csv`
//! from one directory. Rows are upserted by id inside a single transaction,
//! so a re-import refreshes the static tables without touching recorded
//! votes or users. Blank cells are absent values and unknown columns are
//! ignored.

use ::anyhow::Context;
use ::std::path::Path;

#[derive(::serde::Deserialize, Debug)]
struct CategoryRecord {
    id: i32,
    category_name: String,
    description: Option<String>,
    category_text: Option<String>,
    category_text_long: Option<String>,
    version: Option<String>,
    uuid: Option<String>,
}

#[derive(::serde::Deserialize, Debug)]
struct BlockRecord {
    id: i32,
    category_id: i32,
    block_number: i32,
    block_text: Option<String>,
    version: Option<String>,
    uuid: Option<String>,
}

#[derive(::serde::Deserialize, Debug)]
struct QuestionRecord {
    id: i32,
    question_id: String,
    question_number: Option<i32>,
    question_text: String,
    category_id: i32,
    #[serde(default, deserialize_with = "deserialize_flag")]
    is_start_question: bool,
    parent_question_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    check_box: bool,
    block_number: Option<i32>,
    color_code: Option<String>,
    version: Option<String>,
}

#[derive(::serde::Deserialize, Debug)]
struct OptionRecord {
    id: i32,
    question_id: String,
    option_code: String,
    option_text: String,
    next_question_id: Option<String>,
    response_message: Option<String>,
    companion_advice: Option<String>,
    tone_tag: Option<String>,
    version: Option<String>,
    uuid: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
pub struct ImportSummary {
    pub categories: usize,
    pub blocks: usize,
    pub questions: usize,
    pub options: usize,
}

/// Only the literal `TRUE`, in any case, is true.
fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("TRUE")
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: ::serde::Deserializer<'de>,
{
    let value: Option<String> = ::serde::Deserialize::deserialize(deserializer)?;
    Ok(value.as_deref().map(parse_flag).unwrap_or(false))
}

fn parse_records<T, R>(reader: R) -> ::anyhow::Result<Vec<T>>
where
    T: ::serde::de::DeserializeOwned,
    R: ::std::io::Read,
{
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, record) in reader.deserialize().enumerate() {
        records.push(record.with_context(|| format!("row {}", index + 1))?);
    }
    Ok(records)
}

fn read_records<T>(path: &Path) -> ::anyhow::Result<Vec<T>>
where
    T: ::serde::de::DeserializeOwned,
{
    let file = ::std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    parse_records(file).with_context(|| format!("parsing {}", path.display()))
}

async fn upsert_categories(
    transaction: &mut crate::postgres::Transaction<'_>,
    records: &[CategoryRecord],
) -> ::anyhow::Result<()> {
    let query = "
        INSERT INTO categories (
            id,
            category_name,
            description,
            category_text,
            category_text_long,
            version,
            uuid
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE SET
            category_name      = EXCLUDED.category_name,
            description        = EXCLUDED.description,
            category_text      = EXCLUDED.category_text,
            category_text_long = EXCLUDED.category_text_long,
            version            = EXCLUDED.version,
            uuid               = EXCLUDED.uuid
    ";

    for record in records.iter() {
        ::sqlx::query(query)
            .bind(record.id)
            .bind(&record.category_name)
            .bind(&record.description)
            .bind(&record.category_text)
            .bind(&record.category_text_long)
            .bind(&record.version)
            .bind(&record.uuid)
            .execute(&mut **transaction)
            .await?;
    }

    Ok(())
}

async fn upsert_blocks(
    transaction: &mut crate::postgres::Transaction<'_>,
    records: &[BlockRecord],
) -> ::anyhow::Result<()> {
    let query = "
        INSERT INTO blocks (
            id,
            category_id,
            block_number,
            block_text,
            version,
            uuid
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE SET
            category_id  = EXCLUDED.category_id,
            block_number = EXCLUDED.block_number,
            block_text   = EXCLUDED.block_text,
            version      = EXCLUDED.version,
            uuid         = EXCLUDED.uuid
    ";

    for record in records.iter() {
        ::sqlx::query(query)
            .bind(record.id)
            .bind(record.category_id)
            .bind(record.block_number)
            .bind(&record.block_text)
            .bind(&record.version)
            .bind(&record.uuid)
            .execute(&mut **transaction)
            .await?;
    }

    Ok(())
}

async fn upsert_questions(
    transaction: &mut crate::postgres::Transaction<'_>,
    records: &[QuestionRecord],
) -> ::anyhow::Result<()> {
    let query = "
        INSERT INTO questions (
            id,
            question_id,
            question_number,
            question_text,
            category_id,
            is_start_question,
            parent_question_id,
            check_box,
            block_number,
            color_code,
            version
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (id) DO UPDATE SET
            question_id        = EXCLUDED.question_id,
            question_number    = EXCLUDED.question_number,
            question_text      = EXCLUDED.question_text,
            category_id        = EXCLUDED.category_id,
            is_start_question  = EXCLUDED.is_start_question,
            parent_question_id = EXCLUDED.parent_question_id,
            check_box          = EXCLUDED.check_box,
            block_number       = EXCLUDED.block_number,
            color_code         = EXCLUDED.color_code,
            version            = EXCLUDED.version
    ";

    for record in records.iter() {
        ::sqlx::query(query)
            .bind(record.id)
            .bind(&record.question_id)
            .bind(record.question_number)
            .bind(&record.question_text)
            .bind(record.category_id)
            .bind(record.is_start_question)
            .bind(&record.parent_question_id)
            .bind(record.check_box)
            .bind(record.block_number)
            .bind(&record.color_code)
            .bind(&record.version)
            .execute(&mut **transaction)
            .await?;
    }

    Ok(())
}

async fn upsert_options(
    transaction: &mut crate::postgres::Transaction<'_>,
    records: &[OptionRecord],
) -> ::anyhow::Result<()> {
    let query = "
        INSERT INTO options (
            id,
            question_id,
            option_code,
            option_text,
            next_question_id,
            response_message,
            companion_advice,
            tone_tag,
            version,
            uuid
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (id) DO UPDATE SET
            question_id      = EXCLUDED.question_id,
            option_code      = EXCLUDED.option_code,
            option_text      = EXCLUDED.option_text,
            next_question_id = EXCLUDED.next_question_id,
            response_message = EXCLUDED.response_message,
            companion_advice = EXCLUDED.companion_advice,
            tone_tag         = EXCLUDED.tone_tag,
            version          = EXCLUDED.version,
            uuid             = EXCLUDED.uuid
    ";

    for record in records.iter() {
        ::sqlx::query(query)
            .bind(record.id)
            .bind(&record.question_id)
            .bind(&record.option_code)
            .bind(&record.option_text)
            .bind(&record.next_question_id)
            .bind(&record.response_message)
            .bind(&record.companion_advice)
            .bind(&record.tone_tag)
            .bind(&record.version)
            .bind(&record.uuid)
            .execute(&mut **transaction)
            .await?;
    }

    Ok(())
}

pub async fn import_directory(
    pool: &::sqlx::PgPool,
    directory: &Path,
) -> ::anyhow::Result<ImportSummary> {
    let categories: Vec<CategoryRecord> =
        read_records(&directory.join("categories.csv"))?;
    let questions: Vec<QuestionRecord> =
        read_records(&directory.join("questions.csv"))?;
    let options: Vec<OptionRecord> =
        read_records(&directory.join("options.csv"))?;
    let blocks: Vec<BlockRecord> = read_records(&directory.join("blocks.csv"))?;

    let mut transaction = pool.begin().await?;

    crate::postgres::prepare_database(&mut transaction).await?;

    upsert_categories(&mut transaction, &categories)
        .await
        .context("importing categories")?;
    upsert_questions(&mut transaction, &questions)
        .await
        .context("importing questions")?;
    upsert_options(&mut transaction, &options)
        .await
        .context("importing options")?;
    upsert_blocks(&mut transaction, &blocks)
        .await
        .context("importing blocks")?;

    transaction.commit().await?;

    let summary = ImportSummary {
        categories: categories.len(),
        blocks: blocks.len(),
        questions: questions.len(),
        options: options.len(),
    };

    ::log::info!(
        "imported {} categories, {} blocks, {} questions, {} options",
        summary.categories,
        summary.blocks,
        summary.questions,
        summary.options
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("true"));
        assert!(parse_flag("True"));
        assert!(!parse_flag("FALSE"));
        assert!(!parse_flag("1"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_blank_cells_are_absent() {
        let csv = "\u{feff}id,question_id,question_number,question_text,\
                   category_id,is_start_question,check_box,block_number,extra\n\
                   1,Q1,1,First?,1,TRUE,,,ignored\n\
                   2,Q2, ,Second?,1,false,true,3,\n";

        let records: Vec<QuestionRecord> =
            parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert!(records[0].is_start_question);
        assert!(!records[0].check_box);
        assert_eq!(records[0].block_number, None);
        assert_eq!(records[0].color_code, None);
        assert_eq!(records[1].question_number, None);
        assert!(!records[1].is_start_question);
        assert!(records[1].check_box);
        assert_eq!(records[1].block_number, Some(3));
    }

    #[test]
    fn test_missing_required_column_fails() {
        let csv = "id,category_name\n1,\n";
        assert!(parse_records::<CategoryRecord, _>(csv.as_bytes()).is_ok());

        let csv = "id\n1\n";
        assert!(parse_records::<CategoryRecord, _>(csv.as_bytes()).is_err());
    }

    fn write_fixture(directory: &Path) -> ::anyhow::Result<()> {
        ::std::fs::create_dir_all(directory)?;
        ::std::fs::write(
            directory.join("categories.csv"),
            "id,category_name,category_text,version,uuid\n\
             1,Life,About life,1,\n",
        )?;
        ::std::fs::write(
            directory.join("blocks.csv"),
            "id,category_id,block_number,block_text\n1,1,1,Warm up\n",
        )?;
        ::std::fs::write(
            directory.join("questions.csv"),
            "id,question_id,question_number,question_text,category_id,\
             is_start_question,check_box,block_number\n\
             1,Q1,1,First?,1,TRUE,FALSE,1\n",
        )?;
        ::std::fs::write(
            directory.join("options.csv"),
            "id,category_id,question_id,option_code,option_text,next_question_id\n\
             1,1,Q1,A,Yes,\n\
             2,1,Q1,OTHER,Other,\n",
        )?;
        Ok(())
    }

    #[::sqlx::test]
    async fn test_import_directory_is_repeatable(
        pool: ::sqlx::PgPool,
    ) -> ::anyhow::Result<()> {
        let directory = ::std::env::temp_dir()
            .join(format!("poll-import-{}", ::uuid::Uuid::new_v4()));
        write_fixture(&directory)?;

        let summary = import_directory(&pool, &directory).await?;
        assert_eq!(
            summary,
            ImportSummary {
                categories: 1,
                blocks: 1,
                questions: 1,
                options: 2,
            }
        );

        ::std::fs::write(
            directory.join("questions.csv"),
            "id,question_id,question_number,question_text,category_id,\
             is_start_question,check_box,block_number\n\
             1,Q1,1,\"First, revised?\",1,TRUE,FALSE,1\n",
        )?;
        import_directory(&pool, &directory).await?;

        let mut transaction = pool.begin().await?;
        let question =
            crate::postgres::questions::select_question(&mut transaction, "Q1")
                .await?
                .expect("imported question");
        assert_eq!(question.question_text, "First, revised?");
        assert!(question.is_start_question);
        assert_eq!(
            crate::postgres::test_utils::count_rows(&mut transaction, "options")
                .await?,
            2
        );

        ::std::fs::remove_dir_all(&directory)?;

        Ok(())
    }
}
