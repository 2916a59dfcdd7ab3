//! Panel brightness through WMI (`root\WMI`). Only laptop panels and some
//! all-in-ones expose these classes.

use tracing::debug;
use windows::core::{w, BSTR, PCWSTR, VARIANT};
use windows::Win32::System::Com::{
    CoCreateInstance, CoSetProxyBlanket, CLSCTX_INPROC_SERVER, EOAC_NONE,
    RPC_C_AUTHN_LEVEL_CALL, RPC_C_IMP_LEVEL_IMPERSONATE,
};
use windows::Win32::System::Rpc::{RPC_C_AUTHN_WINNT, RPC_C_AUTHZ_NONE};
use windows::Win32::System::Wmi::{
    IWbemClassObject, IWbemLocator, IWbemServices, WbemLocator, WBEM_FLAG_FORWARD_ONLY,
    WBEM_FLAG_RETURN_IMMEDIATELY, WBEM_GENERIC_FLAG_TYPE, WBEM_INFINITE,
};

use crate::brightness::{BrightnessBackend, BrightnessError};

const METHODS_CLASS: &str = "WmiMonitorBrightnessMethods";
/// Seconds the firmware may take to apply the new level.
const SET_TIMEOUT: i32 = 1;

fn backend(e: windows::core::Error) -> BrightnessError {
    BrightnessError::Backend(e.message().to_string())
}

#[derive(Default)]
pub struct WmiBrightness {
    services: Option<IWbemServices>,
}

impl WmiBrightness {
    /// Connects on first use; COM must already be initialized on this thread.
    fn services(&mut self) -> Result<IWbemServices, BrightnessError> {
        if let Some(services) = &self.services {
            return Ok(services.clone());
        }
        let services = unsafe {
            let locator: IWbemLocator =
                CoCreateInstance(&WbemLocator, None, CLSCTX_INPROC_SERVER).map_err(backend)?;
            let services = locator
                .ConnectServer(
                    &BSTR::from("root\\WMI"),
                    &BSTR::new(),
                    &BSTR::new(),
                    &BSTR::new(),
                    0,
                    &BSTR::new(),
                    None,
                )
                .map_err(backend)?;
            CoSetProxyBlanket(
                &services,
                RPC_C_AUTHN_WINNT,
                RPC_C_AUTHZ_NONE,
                PCWSTR::null(),
                RPC_C_AUTHN_LEVEL_CALL,
                RPC_C_IMP_LEVEL_IMPERSONATE,
                None,
                EOAC_NONE,
            )
            .map_err(backend)?;
            services
        };
        debug!("connected to root\\WMI");
        self.services = Some(services.clone());
        Ok(services)
    }

    /// First instance of `class`, or `Unsupported` when the class is empty.
    fn first_instance(
        services: &IWbemServices,
        class: &str,
    ) -> Result<IWbemClassObject, BrightnessError> {
        unsafe {
            let rows = services
                .ExecQuery(
                    &BSTR::from("WQL"),
                    &BSTR::from(format!("SELECT * FROM {class}").as_str()),
                    WBEM_FLAG_FORWARD_ONLY | WBEM_FLAG_RETURN_IMMEDIATELY,
                    None,
                )
                .map_err(backend)?;
            let mut row = [None; 1];
            let mut returned = 0;
            rows.Next(WBEM_INFINITE, &mut row, &mut returned)
                .ok()
                .map_err(backend)?;
            match row {
                [Some(object)] if returned > 0 => Ok(object),
                _ => Err(BrightnessError::Unsupported),
            }
        }
    }
}

impl BrightnessBackend for WmiBrightness {
    fn get(&mut self) -> Result<u8, BrightnessError> {
        let services = self.services()?;
        let monitor = Self::first_instance(&services, "WmiMonitorBrightness")?;
        let mut value = VARIANT::default();
        unsafe {
            monitor
                .Get(w!("CurrentBrightness"), 0, &mut value, None, None)
                .map_err(backend)?;
        }
        let level = i32::try_from(&value).map_err(backend)?;
        Ok(level.clamp(0, 100) as u8)
    }

    fn set(&mut self, level: u8) -> Result<(), BrightnessError> {
        let services = self.services()?;
        let instance = Self::first_instance(&services, METHODS_CLASS)?;

        unsafe {
            let mut path = VARIANT::default();
            instance
                .Get(w!("__PATH"), 0, &mut path, None, None)
                .map_err(backend)?;
            let path = BSTR::try_from(&path).map_err(backend)?;

            let mut class: Option<IWbemClassObject> = None;
            services
                .GetObject(
                    &BSTR::from(METHODS_CLASS),
                    WBEM_GENERIC_FLAG_TYPE(0),
                    None,
                    Some(&mut class as *mut _),
                    None,
                )
                .map_err(backend)?;
            let class = class.ok_or(BrightnessError::Unsupported)?;

            let mut signature: Option<IWbemClassObject> = None;
            class
                .GetMethod(
                    w!("WmiSetBrightness"),
                    0,
                    &mut signature,
                    std::ptr::null_mut(),
                )
                .map_err(backend)?;
            let signature = signature.ok_or(BrightnessError::Unsupported)?;
            let params = signature.SpawnInstance(0).map_err(backend)?;
            params
                .Put(w!("Timeout"), 0, &VARIANT::from(SET_TIMEOUT), 0)
                .map_err(backend)?;
            params
                .Put(w!("Brightness"), 0, &VARIANT::from(level), 0)
                .map_err(backend)?;

            services
                .ExecMethod(
                    &path,
                    &BSTR::from("WmiSetBrightness"),
                    WBEM_GENERIC_FLAG_TYPE(0),
                    None,
                    &params,
                    None,
                    None,
                )
                .map_err(backend)?;
        }
        Ok(())
    }
}
