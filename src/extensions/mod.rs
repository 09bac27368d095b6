pub mod json_value_ext;
