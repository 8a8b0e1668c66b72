//! Qt Linguist `.ts` 格式的读写
//!
//! 读取端只认识 `TS/context/message` 这一层级，其余元素（如 `dependencies`）
//! 整棵跳过；写入端按 lupdate 的排版输出，保证读回后映射一致。

pub mod reader;
pub mod writer;
