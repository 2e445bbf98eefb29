//! CLI 通用输出格式化模块
//!
//! 提供 table/json 两种输出格式的通用实现

use anyhow::Result;
use std::fmt::Display;
use std::io::{self, Write};
use qsan_client::{FcData, LunData, PoolData, SnapshotData, TargetData, VolumeData};
use serde::Serialize;

/// 可输出为表格行的数据 trait
pub trait TableRow {
    /// 返回表格列标题
    fn headers() -> Vec<&'static str>;

    /// 返回该项的表格行数据
    fn row(&self) -> Vec<String>;
}

/// 表格格式输出
pub fn print_table<T: TableRow>(items: &[T]) {
    let headers = T::headers();

    // 打印表头
    let header_line: String = headers
        .iter()
        .map(|h| format!("{:<20}", h))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", header_line);
    println!("{}", "-".repeat(header_line.len()));

    // 打印数据行
    for item in items {
        let row_line: String = item
            .row()
            .iter()
            .map(|c| format!("{:<20}", c))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{}", row_line);
    }
}

/// JSON 格式输出
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 是否输出 JSON
pub fn wants_json(format: &str) -> bool {
    format == "json"
}

/// 操作结果提示
///
/// json 格式下写到 stderr，stdout 只保留可解析的 JSON。
pub fn print_status(format: &str, message: impl Display) {
    let stdout = io::stdout();
    let stderr = io::stderr();
    let _ = write_status(format, message, &mut stdout.lock(), &mut stderr.lock());
}

fn write_status<O: Write, E: Write>(
    format: &str,
    message: impl Display,
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    if wants_json(format) {
        writeln!(err, "{}", message)
    } else {
        writeln!(out, "{}", message)
    }
}

/// 根据格式参数选择输出方式
pub fn output_formatted<T: TableRow + Serialize>(items: &[T], format: &str) -> Result<()> {
    if wants_json(format) {
        print_json(items)?;
    } else {
        print_table(items);
    }
    Ok(())
}

/// 输出单个对象，json 格式下不包一层数组
pub fn output_one<T: TableRow + Serialize>(item: &T, format: &str) -> Result<()> {
    if wants_json(format) {
        print_json(item)?;
    } else {
        print_table(std::slice::from_ref(item));
    }
    Ok(())
}

impl TableRow for PoolData {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "名称", "配置类型", "RAID", "卷数量"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.provision.clone(),
            self.raid_level.clone(),
            self.num_of_volumes.to_string(),
        ]
    }
}

impl TableRow for VolumeData {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "名称", "存储池", "容量(MB)", "已用(MB)", "状态", "健康"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.pool_id.clone(),
            self.total_size.to_string(),
            self.used_size.to_string(),
            self.state.clone(),
            self.health.clone(),
        ]
    }
}

impl TableRow for SnapshotData {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "名称", "状态", "已用(MB)"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.status.clone(),
            self.used_size.to_string(),
        ]
    }
}

impl TableRow for TargetData {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "名称", "类型", "地址"]
    }

    fn row(&self) -> Vec<String> {
        let addresses: Vec<&str> = self
            .iscsi
            .iter()
            .map(|i| i.iqn.as_str())
            .chain(self.fcp.iter().map(|f| f.wwn.as_str()))
            .collect();

        vec![
            self.id.clone(),
            self.name.clone(),
            self.target_type.clone(),
            addresses.join(","),
        ]
    }
}

impl TableRow for LunData {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "LUN", "卷 ID", "主机"]
    }

    fn row(&self) -> Vec<String> {
        let hosts: Vec<&str> = self.hosts.iter().map(|h| h.name.as_str()).collect();
        vec![
            self.id.clone(),
            self.name.clone(),
            self.volume_id.clone(),
            hosts.join(","),
        ]
    }
}

impl TableRow for FcData {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "WWPN", "速率(Gb)", "拓扑"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.wwpn.clone(),
            self.link_speed.to_string(),
            self.topology.clone(),
        ]
    }
}
