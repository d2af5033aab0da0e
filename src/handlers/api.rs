// JSON endpoint for /api/transform
//
// Arguments arrive as arbitrary JSON, so this is where badly shaped input is
// rejected before it reaches the transformer.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    context::CurrentRequest,
    domain::query::{Additions, ArgumentError, OneOrMany, ParameterSet, QueryTransformer},
    error::AppError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    AddParams,
    RemoveParams,
    RemoveKeys,
    RemoveValues,
    ReplaceParams,
}

#[derive(Debug, Deserialize)]
pub struct TransformRequest {
    pub operation: Operation,
    #[serde(default)]
    pub argument: Value,
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TransformResponse {
    pub url: String,
}

/// Convert the argument for `operation` and run it
pub fn apply(
    qs: &QueryTransformer<'_, CurrentRequest>,
    operation: Operation,
    argument: &Value,
    url: Option<&str>,
) -> Result<String, ArgumentError> {
    Ok(match operation {
        Operation::AddParams => qs.add_params(Additions::from_json("additions", argument)?, url),
        Operation::RemoveParams => qs.remove_params(&ParameterSet::from_json("pairs", argument)?, url),
        Operation::RemoveKeys => qs.remove_keys(OneOrMany::<String>::from_json("keys", argument)?, url),
        Operation::RemoveValues => {
            qs.remove_values(OneOrMany::<String>::from_json("values", argument)?, url)
        }
        Operation::ReplaceParams => {
            qs.replace_params(&ParameterSet::from_json("params", argument)?, url)
        }
    })
}

// POST /api/transform - Apply one operation; without `url` the request's own URI is the baseline
pub async fn transform(
    request: CurrentRequest,
    Json(body): Json<TransformRequest>,
) -> Result<Json<TransformResponse>, AppError> {
    let qs = QueryTransformer::new(&request);

    let url = apply(&qs, body.operation, &body.argument, body.url.as_deref()).map_err(|err| {
        tracing::warn!(operation = ?body.operation, error = %err, "rejected transform argument");
        AppError::from(err)
    })?;

    Ok(Json(TransformResponse { url }))
}
