use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesRange {
    Today,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesMetric {
    Sales,
    Income,
    Expense,
    Customers,
    Discount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalesPoint {
    pub time_label: &'static str,
    pub sales: u64,
    pub income: u64,
    pub expense: u64,
    pub customers: u64,
    pub discount: u64,
}

impl SalesPoint {
    pub fn value(&self, metric: SalesMetric) -> u64 {
        match metric {
            SalesMetric::Sales => self.sales,
            SalesMetric::Income => self.income,
            SalesMetric::Expense => self.expense,
            SalesMetric::Customers => self.customers,
            SalesMetric::Discount => self.discount,
        }
    }

    /// Hour of a `today` point (`"09:00"` -> 9).
    pub fn hour(&self) -> Option<u8> {
        self.time_label.split(':').next()?.parse().ok()
    }
}

impl SalesRange {
    pub const ALL: [SalesRange; 4] = [
        SalesRange::Today,
        SalesRange::Weekly,
        SalesRange::Monthly,
        SalesRange::Yearly,
    ];

    pub fn points(&self) -> &'static [SalesPoint] {
        match self {
            SalesRange::Today => &TODAY,
            SalesRange::Weekly => &WEEKLY,
            SalesRange::Monthly => &MONTHLY,
            SalesRange::Yearly => &YEARLY,
        }
    }
}

impl SalesMetric {
    pub const ALL: [SalesMetric; 5] = [
        SalesMetric::Sales,
        SalesMetric::Income,
        SalesMetric::Expense,
        SalesMetric::Customers,
        SalesMetric::Discount,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SalesMetric::Sales => "Sales",
            SalesMetric::Income => "Income",
            SalesMetric::Expense => "Expense",
            SalesMetric::Customers => "Customers",
            SalesMetric::Discount => "Discount",
        }
    }

    /// Customers are a head count; everything else is money.
    pub fn unit(&self) -> &'static str {
        match self {
            SalesMetric::Customers => "pcs",
            _ => "UZS",
        }
    }
}

impl fmt::Display for SalesRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SalesRange::Today => "today",
            SalesRange::Weekly => "weekly",
            SalesRange::Monthly => "monthly",
            SalesRange::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

impl FromStr for SalesRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(SalesRange::Today),
            "weekly" => Ok(SalesRange::Weekly),
            "monthly" => Ok(SalesRange::Monthly),
            "yearly" => Ok(SalesRange::Yearly),
            other => Err(format!("unknown range: {}", other)),
        }
    }
}

impl FromStr for SalesMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(SalesMetric::Sales),
            "income" => Ok(SalesMetric::Income),
            "expense" => Ok(SalesMetric::Expense),
            "customers" => Ok(SalesMetric::Customers),
            "discount" => Ok(SalesMetric::Discount),
            other => Err(format!("unknown metric: {}", other)),
        }
    }
}

const fn p(
    time_label: &'static str,
    sales: u64,
    income: u64,
    expense: u64,
    customers: u64,
    discount: u64,
) -> SalesPoint {
    SalesPoint {
        time_label,
        sales,
        income,
        expense,
        customers,
        discount,
    }
}

const TODAY: [SalesPoint; 24] = [
    p("00:00", 125000, 112500, 50000, 1250, 12500),
    p("01:00", 98000, 88200, 39200, 980, 9800),
    p("02:00", 78000, 70200, 31200, 780, 7800),
    p("03:00", 65000, 58500, 26000, 650, 6500),
    p("04:00", 72000, 64800, 28800, 720, 7200),
    p("05:00", 95000, 85500, 38000, 950, 9500),
    p("06:00", 140000, 126000, 56000, 1400, 14000),
    p("07:00", 210000, 189000, 84000, 2100, 21000),
    p("08:00", 350000, 315000, 140000, 3500, 35000),
    p("09:00", 450000, 405000, 180000, 4500, 45000),
    p("10:00", 520000, 468000, 208000, 5200, 52000),
    p("11:00", 580000, 522000, 232000, 5800, 58000),
    p("12:00", 610000, 549000, 244000, 6100, 61000),
    p("13:00", 590000, 531000, 236000, 5900, 59000),
    p("14:00", 540000, 486000, 216000, 5400, 54000),
    p("15:00", 510000, 459000, 204000, 5100, 51000),
    p("16:00", 480000, 432000, 192000, 4800, 48000),
    p("17:00", 530000, 477000, 212000, 5300, 53000),
    p("18:00", 580000, 522000, 232000, 5800, 58000),
    p("19:00", 540000, 486000, 216000, 5400, 54000),
    p("20:00", 480000, 432000, 192000, 4800, 48000),
    p("21:00", 350000, 315000, 140000, 3500, 35000),
    p("22:00", 240000, 216000, 96000, 2400, 24000),
    p("23:00", 150000, 135000, 60000, 1500, 15000),
];

const WEEKLY: [SalesPoint; 7] = [
    p("Monday", 3250000, 2925000, 1300000, 32500, 325000),
    p("Tuesday", 3450000, 3105000, 1380000, 34500, 345000),
    p("Wednesday", 3620000, 3258000, 1448000, 36200, 362000),
    p("Thursday", 3820000, 3438000, 1528000, 38200, 382000),
    p("Friday", 4250000, 3825000, 1700000, 42500, 425000),
    p("Saturday", 4780000, 4302000, 1912000, 47800, 478000),
    p("Sunday", 3980000, 3582000, 1592000, 39800, 398000),
];

const MONTHLY: [SalesPoint; 12] = [
    p("January", 98500000, 88650000, 39400000, 985000, 9850000),
    p("February", 102000000, 91800000, 40800000, 1020000, 10200000),
    p("March", 118000000, 106200000, 47200000, 1180000, 11800000),
    p("April", 125000000, 112500000, 50000000, 1250000, 12500000),
    p("May", 130000000, 117000000, 52000000, 1300000, 13000000),
    p("June", 135000000, 121500000, 54000000, 1350000, 13500000),
    p("July", 138000000, 124200000, 55200000, 1380000, 13800000),
    p("August", 142000000, 127800000, 56800000, 1420000, 14200000),
    p("September", 136000000, 122400000, 54400000, 1360000, 13600000),
    p("October", 128000000, 115200000, 51200000, 1280000, 12800000),
    p("November", 123000000, 110700000, 49200000, 1230000, 12300000),
    p("December", 145000000, 130500000, 58000000, 1450000, 14500000),
];

const YEARLY: [SalesPoint; 5] = [
    p("2020", 1250000000, 1125000000, 500000000, 12500000, 125000000),
    p("2021", 1380000000, 1242000000, 552000000, 13800000, 138000000),
    p("2022", 1520000000, 1368000000, 608000000, 15200000, 152000000),
    p("2023", 1670000000, 1503000000, 668000000, 16700000, 167000000),
    p("2024", 1820000000, 1638000000, 728000000, 18200000, 182000000),
];
