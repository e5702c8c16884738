//! SQL generator: plain (non-math) records become a Flyway-style migration.

pub mod escape;

use std::fmt::{self, Write};

use anyhow::Result;

use chrono::NaiveDateTime;
use tracing::info;

use crate::classify;
use crate::content;
use crate::model::ProblemRecord;
use crate::settings::{ContentDefaults, SqlSettings};
pub use escape::{escape_sql_opt, escape_sql_string};

pub struct SqlScript {
    pub text: String,
    pub included: usize,
    pub excluded: usize,
}

/// Render the whole script for `records`, skipping math-bearing ones.
pub fn render_script(
    records: &[ProblemRecord],
    sql: &SqlSettings,
    defaults: &ContentDefaults,
    generated_at: NaiveDateTime,
) -> Result<SqlScript> {
    let (math, plain) = classify::partition(records);
    let mut out = String::new();

    write_header(&mut out, sql, plain.len(), math.len(), generated_at)?;
    out.push_str("-- Lectures 테이블에 데이터 삽입\n\n");

    for (i, record) in plain.iter().enumerate() {
        let position = i + 1;
        write_lecture(&mut out, position, record, sql, defaults)?;
        if position % 100 == 0 {
            info!(rendered = position, total = plain.len(), "rendering lectures");
        }
    }
    out.push_str("-- 완료!\n");

    Ok(SqlScript {
        text: out,
        included: plain.len(),
        excluded: math.len(),
    })
}

fn write_header(
    out: &mut String,
    sql: &SqlSettings,
    included: usize,
    excluded: usize,
    at: NaiveDateTime,
) -> fmt::Result {
    writeln!(out, "-- 백준 문제 데이터 INSERT 스크립트 (수학 기호 없는 문제만)")?;
    writeln!(out, "-- 생성 시간: {}", at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "-- 총 문제 수: {}", included)?;
    writeln!(out, "-- 제외된 문제 수 (수학 기호 포함): {}", excluded)?;
    writeln!(
        out,
        "-- author_id {} 요청, 작성자는 login_id {} 로 조회",
        sql.author_id,
        escape_sql_string(&sql.admin_login)
    )?;
    out.push('\n');

    writeln!(out, "-- admin 사용자 생성 (없으면)")?;
    writeln!(out, "INSERT INTO users (username, login_id, password) VALUES")?;
    writeln!(
        out,
        "({}, {}, {})",
        escape_sql_string(&sql.admin_username),
        escape_sql_string(&sql.admin_login),
        escape_sql_string(&sql.admin_password)
    )?;
    writeln!(out, "ON CONFLICT (login_id) DO NOTHING;\n")
}

fn write_lecture(
    out: &mut String,
    position: usize,
    record: &ProblemRecord,
    sql: &SqlSettings,
    defaults: &ContentDefaults,
) -> fmt::Result {
    let raw_title = content::title(record, defaults);
    let title = escape_sql_string(raw_title);
    let description = escape_sql_string(record.description.as_deref().unwrap_or_default());
    let body = escape_sql_string(&content::render_content(record, defaults));
    let input_content = escape_sql_string(record.input_description.as_deref().unwrap_or_default());
    let output_content = escape_sql_string(record.output_description.as_deref().unwrap_or_default());
    let category = escape_sql_string(content::category(record, defaults));
    let difficulty = escape_sql_opt(record.difficulty.as_ref().map(|d| d.label()));
    let constraints_id = if record.test_cases.is_empty() {
        "NULL".to_string()
    } else {
        sql.constraints_id.to_string()
    };

    writeln!(out, "-- 문제 {}: {}", position, raw_title.replace(['\n', '\r'], " "))?;
    out.push_str(concat!(
        "INSERT INTO lectures (\n",
        "  title, description, content,\n",
        "  input_content, output_content,\n",
        "  type, category, difficulty,\n",
        "  is_public, thumbnail_image_url, duration_minutes,\n",
        "  author_id, constraints_id,\n",
        "  created_at, updated_at\n",
        ") VALUES (\n",
    ));
    writeln!(out, "  {},", title)?;
    writeln!(out, "  {},", description)?;
    writeln!(out, "  {},", body)?;
    writeln!(out, "  {},", input_content)?;
    writeln!(out, "  {},", output_content)?;
    writeln!(out, "  '{}',", record.kind)?;
    writeln!(out, "  {},", category)?;
    writeln!(out, "  {},", difficulty)?;
    writeln!(out, "  {},", record.is_public)?;
    writeln!(out, "  NULL,")?;
    writeln!(out, "  NULL,")?;
    writeln!(
        out,
        "  (SELECT id FROM users WHERE login_id = {}),",
        escape_sql_string(&sql.admin_login)
    )?;
    writeln!(out, "  {},", constraints_id)?;
    writeln!(out, "  NOW(),")?;
    writeln!(out, "  NOW()")?;
    out.push_str(");\n\n");

    if record.test_cases.is_empty() {
        return Ok(());
    }

    writeln!(out, "-- 테스트케이스 (문제 {})", position)?;
    out.push_str("DO $$\nDECLARE\n  lecture_id_var INTEGER;\nBEGIN\n");
    out.push_str("  -- 방금 삽입한 lecture의 ID 찾기\n");
    out.push_str("  SELECT id INTO lecture_id_var FROM lectures\n");
    writeln!(out, "  WHERE title = {}", title)?;
    out.push_str("  ORDER BY created_at DESC LIMIT 1;\n\n");

    for (j, tc) in record.test_cases.iter().enumerate() {
        let order_index = tc.order_index.unwrap_or(j as u32 + 1);
        writeln!(out, "  -- 테스트케이스 {}", j + 1)?;
        out.push_str("  INSERT INTO test_cases (lecture_id, input, expected_output, order_index)\n");
        writeln!(
            out,
            "  VALUES (lecture_id_var, {}, {}, {});\n",
            escape_sql_string(&tc.input),
            escape_sql_string(&tc.expected_output),
            order_index
        )?;
    }
    out.push_str("END $$;\n\n");
    Ok(())
}
