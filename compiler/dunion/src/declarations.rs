//! Loading of union declarations from JSON files.
//!
//! A declaration file is a direct serialisation of the arguments of
//! [dunion_schema::define_schema]:
//!
//! ```json
//! {
//!     "unions": [
//!         {
//!             "name": "Shape",
//!             "variants": [
//!                 { "name": "Rectangle", "fields": [
//!                     { "name": "width", "type": "f64" },
//!                     { "name": "length", "type": "f64" }
//!                 ] },
//!                 { "name": "Circle", "fields": [{ "name": "radius", "type": "f64" }] }
//!             ]
//!         }
//!     ]
//! }
//! ```
//!
//! A field type is either the name of a primitive type, or the name of a
//! union that is declared earlier in the same file.
use std::{fmt, fs, path::Path};

use dunion_reporting::{error_codes::ErrorCode, report::Report};
use dunion_repr::LayoutStorage;
use dunion_schema::{
    Variant, define_schema, error::SchemaError, identifier::Identifier, ty::FieldTy,
};
use dunion_utils::{fxhash::FxHashMap, log};
use dunion_value::UnionRepr;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationFile {
    pub unions: Vec<UnionDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnionDecl {
    pub name: String,
    pub variants: Vec<VariantDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantDecl {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub ty: String,
}

/// An error that occurred while loading declarations.
#[derive(Debug)]
pub enum DeclarationError {
    /// The declaration file could not be read.
    Io { path: String, error: std::io::Error },

    /// The declaration file is not valid.
    Malformed { message: String },

    /// Two unions share the same name.
    DuplicateUnion { name: Identifier },

    /// A field type is neither a primitive nor an earlier union.
    UnknownFieldType { union: Identifier, variant: Identifier, ty: String },

    /// The union was rejected when it was defined.
    Schema(SchemaError),

    /// A union that was asked for is not declared.
    UnknownUnion { name: String },
}

impl From<SchemaError> for DeclarationError {
    fn from(error: SchemaError) -> Self {
        DeclarationError::Schema(error)
    }
}

impl fmt::Display for DeclarationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationError::Io { path, error } => {
                write!(f, "couldn't read declarations from `{path}`: {error}")
            }
            DeclarationError::Malformed { message } => {
                write!(f, "malformed declarations: {message}")
            }
            DeclarationError::DuplicateUnion { name } => {
                write!(f, "union `{name}` is declared multiple times")
            }
            DeclarationError::UnknownFieldType { union, variant, ty } => {
                write!(f, "unknown type `{ty}` in a field of `{union}::{variant}`")
            }
            DeclarationError::Schema(error) => write!(f, "{error}"),
            DeclarationError::UnknownUnion { name } => {
                write!(f, "no union named `{name}` is declared")
            }
        }
    }
}

impl std::error::Error for DeclarationError {}

impl From<DeclarationError> for Report {
    fn from(error: DeclarationError) -> Self {
        let code = match &error {
            DeclarationError::Schema(error) => return Report::from(error.clone()),
            DeclarationError::Io { .. } => ErrorCode::Io,
            DeclarationError::Malformed { .. } | DeclarationError::DuplicateUnion { .. } => {
                ErrorCode::MalformedDeclaration
            }
            DeclarationError::UnknownFieldType { .. } => ErrorCode::UnknownFieldType,
            DeclarationError::UnknownUnion { .. } => ErrorCode::InvalidArgument,
        };

        let mut report = Report::new();
        report.code(code).title(&error);

        if let DeclarationError::UnknownFieldType { .. } = error {
            report.add_note("help", "field types must be primitives, or unions declared earlier");
        }

        report
    }
}

/// All of the unions of a declaration file, in declaration order.
#[derive(Debug, Default)]
pub struct Declarations {
    unions: Vec<UnionRepr>,
    lookup: FxHashMap<Identifier, usize>,
}

impl Declarations {
    /// Read and define all of the unions in the given file.
    pub fn load(path: &Path, storage: &LayoutStorage) -> Result<Self, DeclarationError> {
        let source = fs::read_to_string(path)
            .map_err(|error| DeclarationError::Io { path: path.display().to_string(), error })?;

        Self::from_source(&source, storage)
    }

    /// Define all of the unions in the given JSON source.
    pub fn from_source(source: &str, storage: &LayoutStorage) -> Result<Self, DeclarationError> {
        let file: DeclarationFile = serde_json::from_str(source)
            .map_err(|error| DeclarationError::Malformed { message: error.to_string() })?;

        let mut declarations = Self::default();

        for decl in file.unions {
            let name = Identifier::from(decl.name);

            if declarations.lookup.contains_key(&name) {
                return Err(DeclarationError::DuplicateUnion { name });
            }

            let variants = decl
                .variants
                .into_iter()
                .map(|variant| declarations.resolve_variant(&name, variant, storage))
                .collect::<Result<Vec<_>, _>>()?;

            let schema = define_schema(name.clone(), variants)?;
            declarations.lookup.insert(name, declarations.unions.len());
            declarations.unions.push(UnionRepr::new(storage, schema));
        }

        log::debug!("loaded {} union declaration(s)", declarations.unions.len());
        Ok(declarations)
    }

    fn resolve_variant(
        &self,
        union: &Identifier,
        decl: VariantDecl,
        storage: &LayoutStorage,
    ) -> Result<Variant, DeclarationError> {
        let variant = Identifier::from(decl.name);

        let fields = decl
            .fields
            .into_iter()
            .map(|field| {
                let ty = self.resolve_ty(&field.ty).ok_or_else(|| {
                    DeclarationError::UnknownFieldType {
                        union: union.clone(),
                        variant: variant.clone(),
                        ty: field.ty.clone(),
                    }
                })?;

                let spec = storage.field_spec(ty);
                Ok(match field.name {
                    Some(name) => spec.named(name),
                    None => spec,
                })
            })
            .collect::<Result<Vec<_>, DeclarationError>>()?;

        Ok(Variant::new(variant, fields))
    }

    fn resolve_ty(&self, name: &str) -> Option<FieldTy> {
        FieldTy::primitive_from_name(name).or_else(|| {
            let repr = self.get(name).ok()?;
            Some(FieldTy::Union(repr.schema().clone()))
        })
    }

    /// Get a declared union by its name.
    pub fn get(&self, name: &str) -> Result<&UnionRepr, DeclarationError> {
        self.lookup
            .get(name)
            .map(|index| &self.unions[*index])
            .ok_or_else(|| DeclarationError::UnknownUnion { name: name.to_string() })
    }

    /// Iterate over all of the declared unions.
    pub fn iter(&self) -> impl Iterator<Item = &UnionRepr> {
        self.unions.iter()
    }

    pub fn len(&self) -> usize {
        self.unions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unions.is_empty()
    }
}
