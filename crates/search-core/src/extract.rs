// search-core/src/extract.rs
//! 文本提取模块
//!
//! 每种格式一个提取器，由 [`ExtractorRegistry`] 按顺序选择。
//! 提取失败不会向上传播，而是变成 `[...]` 占位文本写入文档正文。

use std::fs;
use std::io::Read;
use std::path::Path;
use anyhow::Result;
use calamine::{open_workbook, Reader, Xlsx};
use chardetng::EncodingDetector;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};

/// 文本提取器
pub trait TextExtractor: Send + Sync {
    /// 是否支持该文件
    fn can_extract(&self, path: &Path) -> bool;

    /// 提取纯文本
    fn extract(&self, path: &Path) -> Result<String>;

    /// 提取失败时写入正文的占位文本
    fn placeholder(&self, path: &Path, err: &anyhow::Error) -> String;
}

/// 小写扩展名，不含点
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// 智能读取文本文件（自动检测编码）
fn read_text_with_encoding_detection(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;

    // 先尝试UTF-8
    if let Ok(text) = std::str::from_utf8(&bytes) {
        tracing::debug!("文件使用 UTF-8 编码: {:?}", path);
        return Ok(text.to_string());
    }

    // 使用 chardetng 检测编码
    let mut detector = EncodingDetector::new();
    detector.feed(&bytes, true);
    let detected_encoding = detector.guess(None, true);

    tracing::debug!("检测到文件编码 {:?}: {:?}", detected_encoding.name(), path);

    let (decoded, encoding_used, had_errors) = detected_encoding.decode(&bytes);

    if had_errors {
        tracing::warn!("文件 {:?} 使用 {} 解码时有部分错误，可能影响搜索准确性", path, encoding_used.name());
    }

    Ok(decoded.into_owned())
}

/// 纯文本类文件
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub const SUPPORTED_EXTENSIONS: &'static [&'static str] = &[
        "txt", "md", "json", "xml", "csv", "log",
        "html", "css", "js", "ts", "cs", "java",
        "py", "yml", "yaml", "config", "env",
        "c", "cpp", "h", "hpp", "go", "rs", "rb",
        "php", "swift", "kt", "scala", "sh", "bat",
    ];
}

impl TextExtractor for PlainTextExtractor {
    fn can_extract(&self, path: &Path) -> bool {
        extension_of(path)
            .is_some_and(|ext| Self::SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
    }

    fn extract(&self, path: &Path) -> Result<String> {
        read_text_with_encoding_detection(path)
    }

    fn placeholder(&self, path: &Path, err: &anyhow::Error) -> String {
        format!("[Unable to read: {} - {:#}]", file_name_of(path), err)
    }
}

/// Word 文档 (.docx)
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn can_extract(&self, path: &Path) -> bool {
        extension_of(path).as_deref() == Some("docx")
    }

    fn extract(&self, path: &Path) -> Result<String> {
        let mut bytes = Vec::new();
        fs::File::open(path)?.read_to_end(&mut bytes)?;
        let docx = docx_rs::read_docx(&bytes)?;

        // 每个段落一行，方便摘录和摘要按行处理
        let mut paragraphs = Vec::new();
        for child in &docx.document.children {
            if let DocumentChild::Paragraph(paragraph) = child {
                let mut line = String::new();
                for paragraph_child in &paragraph.children {
                    if let ParagraphChild::Run(run) = paragraph_child {
                        for run_child in &run.children {
                            if let RunChild::Text(text) = run_child {
                                line.push_str(&text.text);
                            }
                        }
                    }
                }
                paragraphs.push(line);
            }
        }

        Ok(paragraphs.join("\n"))
    }

    fn placeholder(&self, _path: &Path, err: &anyhow::Error) -> String {
        format!("[Unable to read Word document: {:#}]", err)
    }
}

/// Excel 表格 (.xlsx)
pub struct XlsxExtractor;

impl TextExtractor for XlsxExtractor {
    fn can_extract(&self, path: &Path) -> bool {
        extension_of(path).as_deref() == Some("xlsx")
    }

    fn extract(&self, path: &Path) -> Result<String> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;

        let mut text = String::new();
        for sheet_name in workbook.sheet_names() {
            let range = match workbook.worksheet_range(&sheet_name) {
                Ok(range) => range,
                Err(e) => {
                    tracing::warn!("跳过工作表 {} ({:?}): {}", sheet_name, path, e);
                    continue;
                }
            };
            for row in range.rows() {
                for cell in row {
                    let value = cell.to_string();
                    if !value.trim().is_empty() {
                        text.push_str(&value);
                        text.push(' ');
                    }
                }
            }
        }

        Ok(text)
    }

    fn placeholder(&self, _path: &Path, err: &anyhow::Error) -> String {
        format!("[Unable to read Excel file: {:#}]", err)
    }
}

/// PDF 文档
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn can_extract(&self, path: &Path) -> bool {
        extension_of(path).as_deref() == Some("pdf")
    }

    fn extract(&self, path: &Path) -> Result<String> {
        // pdf-extract 遇到损坏文件可能直接 panic
        let text = std::panic::catch_unwind(|| pdf_extract::extract_text(path))
            .map_err(|_| anyhow::anyhow!("parser panicked"))??;
        Ok(text)
    }

    fn placeholder(&self, _path: &Path, err: &anyhow::Error) -> String {
        format!("[Unable to read PDF: {:#}]", err)
    }
}

/// 提取器注册表，按注册顺序取第一个支持该文件的提取器
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    pub fn new(extractors: Vec<Box<dyn TextExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn get_extractor(&self, path: &Path) -> Option<&dyn TextExtractor> {
        self.extractors
            .iter()
            .find(|extractor| extractor.can_extract(path))
            .map(|extractor| extractor.as_ref())
    }

    /// 提取文件内容，永远返回文本
    pub fn extract_content(&self, path: &Path) -> String {
        let Some(extractor) = self.get_extractor(path) else {
            return format!("[Binary file: {}]", file_name_of(path));
        };

        tracing::debug!("正在解析文件: {:?}", path);
        match extractor.extract(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("提取失败 {:?}: {:#}", path, e);
                extractor.placeholder(path, &e)
            }
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new(vec![
            Box::new(PlainTextExtractor),
            Box::new(DocxExtractor),
            Box::new(XlsxExtractor),
            Box::new(PdfExtractor),
        ])
    }
}
