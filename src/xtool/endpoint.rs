use serde_json::{Value, json};

pub const RUNNING_STATUS: &str = "runningStatus";
pub const MACHINE_INFO: &str = "machineInfo";
pub const WORKHEAD_ID: &str = "workhead_ID";
pub const KNIFE_HEAD: &str = "knife_head";
pub const WORKING_INFO: &str = "workingInfo";
pub const DRAWER: &str = "drawer";
pub const SMOKING_FAN: &str = "smoking_fan";
pub const EXT_PURIFIER: &str = "ext_purifier";
pub const MACHINE_LOCK: &str = "machine_lock";
pub const GAP: &str = "gap";
pub const HEIGHTEN: &str = "heighten";
pub const AIRASSIST: &str = "airassist";
pub const ADSORPTION_MAT: &str = "adsorption_mat";
pub const POSITION: &str = "position";
pub const Z_NTC_TEMP: &str = "Z_ntc_temp";
pub const CONFIG: &str = "config";
pub const INKJET_PRINTER: &str = "inkjet_printer_get";

/// User configuration values read in one batch through `/config/get`.
pub const CONFIG_KEYS: [&str; 15] = [
    "fillLightBrightness",
    "purifierTimeout",
    "workingMode",
    "flameLevelHLSelect",
    "airassistCut",
    "airassistGrave",
    "EXTPurifierTimeout",
    "purifierSpeed",
    "purifierBlockAlarm",
    "beepEnable",
    "taskId",
    "adsorptionMatAutoControl",
    "isAbnormalShakingMachine",
    "flameLevel1ValueH",
    "flameLevel1ValueL",
];

#[derive(PartialEq, Debug, Clone)]
pub enum Method {
    Get,
    Post(Value),
}

/// Where a successful response lands in the snapshot.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Target {
    /// The whole body is merged into the top level, without a `code`/`data` envelope.
    TopLevel,
    /// The envelope's `data` is stored under the key when `code` is 0.
    Key(&'static str),
}

#[derive(PartialEq, Debug, Clone)]
pub struct Endpoint {
    pub target: Target,
    pub path: &'static str,
    pub method: Method,
}

impl Endpoint {
    fn get(key: &'static str, path: &'static str) -> Self {
        Endpoint {
            target: Target::Key(key),
            path,
            method: Method::Get,
        }
    }

    fn post(key: &'static str, path: &'static str, body: Value) -> Self {
        Endpoint {
            target: Target::Key(key),
            path,
            method: Method::Post(body),
        }
    }

    /// The flat status document of the simple models.
    pub fn status() -> Self {
        Endpoint {
            target: Target::TopLevel,
            path: "/status",
            method: Method::Get,
        }
    }

    pub fn exhaust_fan(on: bool) -> Self {
        let action = if on { "on" } else { "off" };
        Endpoint::post(SMOKING_FAN, "/peripheral/smoking_fan", json!({ "action": action }))
    }

    pub fn sync_knife_head() -> Self {
        Endpoint::post(KNIFE_HEAD, "/peripheral/knife_head", json!({ "action": "get_sync" }))
    }
}

/// The M1 Ultra endpoints in the order they are polled.
pub fn peripheral_endpoints() -> Vec<Endpoint> {
    let get = || json!({ "action": "get" });

    vec![
        Endpoint {
            target: Target::TopLevel,
            path: "/system?action=version_v2",
            method: Method::Get,
        },
        Endpoint::get(RUNNING_STATUS, "/device/runningStatus"),
        Endpoint::get(MACHINE_INFO, "/device/machineInfo"),
        Endpoint::post(WORKHEAD_ID, "/peripheral/workhead_ID", get()),
        Endpoint::post(KNIFE_HEAD, "/peripheral/knife_head", get()),
        Endpoint::get(WORKING_INFO, "/device/workingInfo"),
        Endpoint::get(DRAWER, "/peripheral/drawer"),
        Endpoint::get(SMOKING_FAN, "/peripheral/smoking_fan"),
        Endpoint::get(EXT_PURIFIER, "/peripheral/ext_purifier"),
        Endpoint::get(MACHINE_LOCK, "/peripheral/machine_lock"),
        Endpoint::get(GAP, "/peripheral/gap"),
        Endpoint::get(HEIGHTEN, "/peripheral/heighten"),
        Endpoint::get(AIRASSIST, "/peripheral/airassist"),
        Endpoint::post(ADSORPTION_MAT, "/peripheral/adsorption_mat", get()),
        Endpoint::post(POSITION, "/peripheral/position", json!({ "aix": "all", "datatype": "absolute" })),
        Endpoint::post(Z_NTC_TEMP, "/peripheral/Z_ntc_temp", get()),
        Endpoint::post(CONFIG, "/config/get", json!({ "alias": "config", "type": "user", "kv": CONFIG_KEYS })),
        Endpoint::post(INKJET_PRINTER, "/peripheral/inkjet_printer", get()),
    ]
}
