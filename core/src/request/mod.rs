pub mod parser;
pub mod types;

pub use parser::{collect_params, parse_form_body, parse_json_body, parse_query_string};
pub use types::{HttpRequest, ParamSet, RequestBody};
