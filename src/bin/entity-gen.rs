//! Standalone schema-to-struct generator.
//!
//! Reads a GraphQL schema, extracts `type` blocks with a pair of regexes,
//! and writes one Rust struct file per type. Pure text substitution; shares
//! nothing with the client library.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use regex::Regex;

struct GqlType {
    name: String,
    fields: Vec<GqlField>,
}

struct GqlField {
    name: String,
    type_name: String,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: entity-gen <schema.graphql> <output-dir>");
        return ExitCode::FAILURE;
    }

    let schema_path = Path::new(&args[1]);
    let output_dir = Path::new(&args[2]);

    let schema = match fs::read_to_string(schema_path) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Cannot read schema {}: {e}", schema_path.display());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::create_dir_all(output_dir) {
        eprintln!("Cannot create {}: {e}", output_dir.display());
        return ExitCode::FAILURE;
    }

    for gql_type in parse_types(&schema) {
        let code = generate_struct(&gql_type);
        let file_path = output_dir.join(format!("{}.rs", snake_case(&gql_type.name)));
        if let Err(e) = fs::write(&file_path, code) {
            eprintln!("Cannot write {}: {e}", file_path.display());
            return ExitCode::FAILURE;
        }
        println!("Generated: {}", file_path.display());
    }

    ExitCode::SUCCESS
}

fn parse_types(schema: &str) -> Vec<GqlType> {
    // Panics on a malformed pattern only, which is a programming error.
    let type_re = Regex::new(r"type\s+(\w+)\s*\{([^}]*)\}").unwrap();
    let field_re = Regex::new(r"(\w+)\s*(?:\([^)]*\))?\s*:\s*([!\[\]\w]+)").unwrap();

    type_re
        .captures_iter(schema)
        .map(|type_cap| GqlType {
            name: type_cap[1].to_string(),
            fields: field_re
                .captures_iter(&type_cap[2])
                .map(|field_cap| GqlField {
                    name: field_cap[1].to_string(),
                    type_name: field_cap[2].to_string(),
                })
                .collect(),
        })
        .collect()
}

fn generate_struct(gql_type: &GqlType) -> String {
    let mut code = String::new();
    code.push_str("use serde::{Deserialize, Serialize};\n\n");
    code.push_str("#[derive(Debug, Clone, Serialize, Deserialize)]\n");
    code.push_str(&format!("pub struct {} {{\n", gql_type.name));
    for field in &gql_type.fields {
        let rust_name = snake_case(&field.name);
        if rust_name != field.name {
            code.push_str(&format!("    #[serde(rename = \"{}\")]\n", field.name));
        }
        code.push_str(&format!("    pub {}: {},\n", rust_name, map_type(&field.type_name)));
    }
    code.push_str("}\n");
    code
}

/// Map a GraphQL type reference to a Rust type. Nullable positions become
/// `Option`, lists become `Vec`, scalars map to their std counterparts.
fn map_type(gql_type: &str) -> String {
    let non_null = gql_type.ends_with('!');
    let inner = gql_type.trim_end_matches('!');

    let mapped = if let Some(list_inner) = inner.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        format!("Vec<{}>", map_type(list_inner))
    } else {
        match inner {
            "Int" => "i64".to_string(),
            "Float" => "f64".to_string(),
            "Boolean" => "bool".to_string(),
            "String" | "ID" => "String".to_string(),
            other => other.to_string(),
        }
    };

    if non_null {
        mapped
    } else {
        format!("Option<{mapped}>")
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
