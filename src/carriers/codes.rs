use crate::utils::error::BuildError;

/// 代碼表中的一筆：領域符號 ↔ 承運商代碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    pub symbol: &'static str,
    pub code: &'static str,
    pub description: &'static str,
}

/// 封閉的常數代碼表；新增代碼只需擴充表格，不需改動解析邏輯
#[derive(Debug)]
pub struct CodeTable {
    pub field: &'static str,
    pub entries: &'static [CodeEntry],
}

impl CodeTable {
    pub fn by_symbol(&self, symbol: &str) -> Option<&'static CodeEntry> {
        let wanted = symbol.trim();
        self.entries
            .iter()
            .find(|entry| entry.symbol.eq_ignore_ascii_case(wanted))
    }

    pub fn by_code(&self, code: &str) -> Option<&'static CodeEntry> {
        let wanted = code.trim();
        self.entries.iter().find(|entry| entry.code == wanted)
    }

    /// 找不到符號時回傳指出欄位與包裹的 BuildError
    pub fn resolve(&self, symbol: &str, package_id: &str) -> Result<&'static CodeEntry, BuildError> {
        self.by_symbol(symbol).ok_or_else(|| BuildError::UnknownCode {
            field: self.field,
            value: symbol.to_string(),
            package_id: package_id.to_string(),
        })
    }

    /// 與包裹無關的設定（帳單、文件格式）
    pub fn resolve_setting(&self, symbol: &str) -> Result<&'static CodeEntry, BuildError> {
        self.by_symbol(symbol).ok_or_else(|| BuildError::UnknownSetting {
            field: self.field,
            value: symbol.to_string(),
        })
    }
}
