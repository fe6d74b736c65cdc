//! Static table of the report fields exported as metrics.

use crate::convert::{convert_alarm_delay, convert_numeric, convert_status, Conversion, Converter};

macro_rules! metric_prefix {
    () => {
        "apcupsd_ups_"
    };
}

/// Prefix shared by every UPS metric name.
pub const METRIC_PREFIX: &str = metric_prefix!();

/// One exported report field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition {
    /// Report key, e.g. `LINEV`.
    pub key: &'static str,
    /// Exported metric name.
    pub metric_name: &'static str,
    /// Help text attached to the metric when it is first created.
    pub help: &'static str,
    /// Converter for the raw value.
    pub convert: Converter,
}

impl FieldDefinition {
    /// Converts a raw value for this field.
    #[inline]
    pub fn convert(&self, raw: &str) -> Conversion {
        (self.convert)(raw)
    }
}

macro_rules! field_table {
    ($( $key:literal => $name:literal, $convert:path, $help:literal; )*) => {
        /// Every report key exported as a metric. Other keys are ignored.
        pub static FIELDS: &[FieldDefinition] = &[
            $(FieldDefinition {
                key: $key,
                metric_name: concat!(metric_prefix!(), $name),
                help: $help,
                convert: $convert,
            },)*
        ];
    };
}

field_table! {
    "STATUS" => "status", convert_status,
        "UPS status bitmask: sum of 2^bit per flag (ONBATT=1, CAL=2, TRIM=3, BOOST=4, OVERLOAD=5, LOWBATT=6, REPLACEBATT=7, NOBATT=8, SLAVE=9, SLAVEDOWN=10, SHUTTING DOWN=11); 0 when online or unreachable";
    "LINEV" => "linev", convert_numeric, "Current input line voltage";
    "LOADPCT" => "loadpct", convert_numeric, "Percentage of UPS load capacity used as estimated by UPS";
    "BCHARGE" => "bcharge", convert_numeric, "Current battery capacity charge percentage";
    "TIMELEFT" => "timeleft", convert_numeric, "Remaining runtime left on battery as estimated by the UPS";
    "MBATTCHG" => "mbattchg", convert_numeric, "Min battery charge % (BCHARGE) required for system shutdown";
    "MINTIMEL" => "mintimel", convert_numeric, "Min battery runtime (MINUTES) required for system shutdown";
    "MAXTIME" => "maxtime", convert_numeric, "Max battery runtime (TIMEOUT) after which system is shutdown";
    "MAXLINEV" => "maxlinev", convert_numeric, "Maximum input line voltage since apcupsd started";
    "MINLINEV" => "minlinev", convert_numeric, "Min (observed) input line voltage since apcupsd started";
    "OUTPUTV" => "outputv", convert_numeric, "Current UPS output voltage";
    "SENSE" => "sense", convert_numeric, "Current UPS sensitivity setting for voltage fluctuations";
    "DWAKE" => "dwake", convert_numeric, "Time UPS waits after power off when the power is restored";
    "DSHUTD" => "dshutd", convert_numeric, "Delay before UPS powers down after command received";
    "DLOWBATT" => "dlowbatt", convert_numeric, "Low battery signal sent when this much runtime remains";
    "LOTRANS" => "lotrans", convert_numeric, "Input line voltage below which UPS will switch to battery";
    "HITRANS" => "hitrans", convert_numeric, "Input line voltage above which UPS will switch to battery";
    "RETPCT" => "retpct", convert_numeric, "Battery charge % required after power off to restore power";
    "ITEMP" => "itemp", convert_numeric, "UPS internal temperature in degrees Celsius";
    "ALARMDEL" => "alarmdel", convert_alarm_delay,
        "Delay period before UPS starts sounding alarm (30 Seconds=1, Low Battery=2, No alarm=3, 5 Seconds=4, Always=5)";
    "BATTV" => "battv", convert_numeric, "Current battery voltage";
    "LINEFREQ" => "linefreq", convert_numeric, "Current line frequency in Hertz";
    "TONBATT" => "tonbatt", convert_numeric, "Seconds currently on battery";
    "NOMOUTV" => "nomoutv", convert_numeric, "Nominal output voltage to supply when on battery power";
    "NOMBATTV" => "nombattv", convert_numeric, "Nominal battery voltage";
    "EXTBATTS" => "extbatts", convert_numeric, "Number of external batteries (for XL models)";
    "BADBATTS" => "badbatts", convert_numeric, "Number of bad external battery packs (for XL models)";
    "CUMONBATT" => "cumonbatt", convert_numeric, "Cumulative seconds on battery since apcupsd startup";
    "HUMIDITY" => "humidity", convert_numeric, "Ambient humidity";
    "AMBTEMP" => "ambtemp", convert_numeric, "Ambient temperature";
}

/// Looks up the definition for a report key.
pub fn field(key: &str) -> Option<&'static FieldDefinition> {
    FIELDS.iter().find(|f| f.key == key)
}
