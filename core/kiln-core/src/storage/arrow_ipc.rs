//! Arrow IPC stream encoding for WOS batches
//!
//! 배치 하나를 IPC stream 메시지로 저장합니다. 읽을 때는 카탈로그의 테이블
//! 스키마로 다시 검사하므로 스키마가 어긋난 blob은 조용히 반환되지 않습니다.

use super::conform_batch;
use crate::catalog::TableMetadata;
use crate::error::{KilnError, KilnResult};
use arrow::ipc::reader::StreamReader;
use arrow::ipc::writer::StreamWriter;
use arrow::record_batch::RecordBatch;
use std::io::Cursor;

/// 배치 → IPC stream bytes
pub fn encode_batch(table: &TableMetadata, batch: &RecordBatch) -> KilnResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut writer = StreamWriter::try_new(&mut buffer, &batch.schema())
        .map_err(|e| corrupt(table, "encode", e))?;
    writer.write(batch).map_err(|e| corrupt(table, "encode", e))?;
    writer.finish().map_err(|e| corrupt(table, "encode", e))?;
    drop(writer);
    Ok(buffer)
}

/// IPC stream bytes → 테이블 스키마를 가진 배치
pub fn decode_batch(table: &TableMetadata, bytes: &[u8]) -> KilnResult<RecordBatch> {
    let mut reader =
        StreamReader::try_new(Cursor::new(bytes), None).map_err(|e| corrupt(table, "decode", e))?;
    let batch = reader
        .next()
        .ok_or_else(|| {
            KilnError::Storage(format!(
                "empty IPC record in table {}",
                table.qualified_name()
            ))
        })?
        .map_err(|e| corrupt(table, "decode", e))?;
    conform_batch(table, &batch)
}

fn corrupt(table: &TableMetadata, op: &str, err: arrow::error::ArrowError) -> KilnError {
    KilnError::Storage(format!(
        "Arrow IPC {op} failed for table {}: {err}",
        table.qualified_name()
    ))
}
