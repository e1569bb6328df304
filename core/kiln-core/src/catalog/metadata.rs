//! Table metadata persistence — schema serialization for the catalog.
//!
//! Arrow schemas are stored as JSON records so that a catalog reopened from
//! disk restores every registered table exactly.

use super::TableMetadata;
use crate::error::{KilnError, KilnResult};
use crate::storage::StorageKind;
use arrow::datatypes::{DataType, Field, Schema};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ════════════════════════════════════════════
// Metadata Structures
// ════════════════════════════════════════════

/// Serializable table record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRecord {
    pub database: String,
    pub table: String,
    pub storage: StorageKind,
    pub fields: Vec<FieldMetadata>,
}

/// Serializable field metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

// ════════════════════════════════════════════
// Conversion
// ════════════════════════════════════════════

impl TryFrom<&TableMetadata> for TableRecord {
    type Error = KilnError;

    fn try_from(metadata: &TableMetadata) -> Result<Self, Self::Error> {
        let fields = metadata
            .schema
            .fields()
            .iter()
            .map(|field| {
                Ok(FieldMetadata {
                    name: field.name().clone(),
                    data_type: datatype_to_string(field.data_type())?,
                    nullable: field.is_nullable(),
                })
            })
            .collect::<KilnResult<Vec<_>>>()?;

        Ok(TableRecord {
            database: metadata.database.clone(),
            table: metadata.table.clone(),
            storage: metadata.storage,
            fields,
        })
    }
}

impl TryFrom<TableRecord> for TableMetadata {
    type Error = KilnError;

    fn try_from(record: TableRecord) -> Result<Self, Self::Error> {
        let fields = record
            .fields
            .iter()
            .map(|field| {
                let data_type = string_to_datatype(&field.data_type)?;
                Ok(Field::new(&field.name, data_type, field.nullable))
            })
            .collect::<KilnResult<Vec<_>>>()?;

        Ok(TableMetadata::new(
            record.database,
            record.table,
            record.storage,
            Arc::new(Schema::new(fields)),
        ))
    }
}

// ════════════════════════════════════════════
// DataType Conversion Helpers
// ════════════════════════════════════════════

/// Convert Arrow DataType to its catalog name
fn datatype_to_string(data_type: &DataType) -> KilnResult<String> {
    let name = match data_type {
        DataType::Int8 => "Int8",
        DataType::Int16 => "Int16",
        DataType::Int32 => "Int32",
        DataType::Int64 => "Int64",
        DataType::UInt8 => "UInt8",
        DataType::UInt16 => "UInt16",
        DataType::UInt32 => "UInt32",
        DataType::UInt64 => "UInt64",
        DataType::Float32 => "Float32",
        DataType::Float64 => "Float64",
        DataType::Utf8 => "Utf8",
        DataType::LargeUtf8 => "LargeUtf8",
        DataType::Boolean => "Boolean",
        DataType::Binary => "Binary",
        DataType::Date32 => "Date32",
        DataType::Date64 => "Date64",
        other => {
            return Err(KilnError::Schema(format!(
                "Unsupported data type: {other:?}"
            )));
        }
    };
    Ok(name.to_string())
}

/// Convert catalog name back to Arrow DataType
fn string_to_datatype(s: &str) -> KilnResult<DataType> {
    match s {
        "Int8" => Ok(DataType::Int8),
        "Int16" => Ok(DataType::Int16),
        "Int32" => Ok(DataType::Int32),
        "Int64" => Ok(DataType::Int64),
        "UInt8" => Ok(DataType::UInt8),
        "UInt16" => Ok(DataType::UInt16),
        "UInt32" => Ok(DataType::UInt32),
        "UInt64" => Ok(DataType::UInt64),
        "Float32" => Ok(DataType::Float32),
        "Float64" => Ok(DataType::Float64),
        "Utf8" => Ok(DataType::Utf8),
        "LargeUtf8" => Ok(DataType::LargeUtf8),
        "Boolean" => Ok(DataType::Boolean),
        "Binary" => Ok(DataType::Binary),
        "Date32" => Ok(DataType::Date32),
        "Date64" => Ok(DataType::Date64),
        _ => Err(KilnError::Schema(format!("Unsupported data type: {s}"))),
    }
}
