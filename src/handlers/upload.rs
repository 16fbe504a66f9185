// src/handlers/upload.rs

use axum::extract::Multipart;

use crate::error::AppError;

/// Fields of a multipart form upload.
#[derive(Debug)]
pub struct Upload {
    pub form_name: String,
    pub file: Vec<u8>,
    pub protected: bool,
    pub show_answers: bool,
    pub num_questions: Option<usize>,
}

fn parse_flag(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        _ => Err(AppError::BadRequest(format!("Field '{name}' must be a boolean"))),
    }
}

/// Reads `form_name`, `file` and the optional settings out of a multipart body.
pub async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut form_name = None;
    let mut file = None;
    let mut protected = false;
    let mut show_answers = true;
    let mut num_questions = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                file = Some(bytes.to_vec());
            }
            "form_name" | "protected" | "show_answers" | "num_questions" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read '{name}': {e}")))?;
                match name.as_str() {
                    "form_name" => form_name = Some(value.trim().to_string()),
                    "protected" => protected = parse_flag(&name, &value)?,
                    "show_answers" => show_answers = parse_flag(&name, &value)?,
                    _ => {
                        let count = value.trim().parse::<usize>().map_err(|_| {
                            AppError::BadRequest("num_questions must be a number".to_string())
                        })?;
                        num_questions = Some(count);
                    }
                }
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    Ok(Upload {
        form_name: form_name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::BadRequest("form_name is required".to_string()))?,
        file: file.ok_or_else(|| AppError::BadRequest("file is required".to_string()))?,
        protected,
        show_answers,
        num_questions,
    })
}
