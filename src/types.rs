// src/types.rs
use chrono::NaiveDateTime;

// 数据集里的五类气体标签 (0=正常, 1=烟, 2=气, 3=酒, 4=硫)
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum GasClass {
    Normal = 0,
    Smoke = 1,
    Gas = 2,
    Alcohol = 3,
    Sulfide = 4,
}

impl GasClass {
    pub fn code(self) -> usize {
        self as usize
    }
}

// 单通道烟雾报警标签
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum AlarmLabel {
    #[default]
    Normal = 0,
    Alarm = 1,
}

impl AlarmLabel {
    pub fn code(self) -> u8 {
        self as u8
    }
}

// 串口日志里的一行有效读数，通道顺序与设备输出一致
#[derive(Clone, Debug, PartialEq)]
pub struct SensorReading {
    pub time: NaiveDateTime,
    pub mq4: f64,
    pub mq3: f64,
    pub mq7: f64,
    pub mq135: f64,
    pub mq136: f64,
    pub temp: f64,
    pub hum: f64,
    pub pm25: f64,
    // 设备自带的原始标签 (9 列布局才有)，重新打标时会被覆盖
    pub raw_label: Option<f64>,
    pub label: AlarmLabel,
}

// 清洗后 CSV 的列顺序
pub const CLEANED_COLUMNS: [&str; 10] = [
    "Time", "MQ4", "MQ3", "MQ7", "MQ135", "MQ136", "Temp", "Hum", "PM25", "Label",
];

// 训练用的 8 个特征列 + 标签列
pub const FEATURE_COLUMNS: [&str; 8] = [
    "MQ4", "MQ3", "MQ7", "MQ135", "MQ136", "Temp", "Hum", "PM2.5",
];
pub const LABEL_COLUMN: &str = "Label";
