//! Late-bound COM automation through `IDispatch`
//!
//! Excel's object model is reached the way a script reaches it: look up a
//! member's DISPID by name, then `Invoke` it as a property get, a property
//! put or a method call. Errors are plain strings; they travel back to the
//! client as the response message.

#![cfg(windows)]

use std::ffi::c_void;
use std::ptr;

use windows::{
    core::{BSTR, GUID, HSTRING, PCWSTR},
    Win32::{
        Foundation::{DISP_E_EXCEPTION, DISP_E_PARAMNOTFOUND, VARIANT_BOOL},
        Globalization::GetSystemDefaultLCID,
        System::{
            Com::{
                CLSIDFromProgID, CoCreateInstance, IDispatch, CLSCTX_LOCAL_SERVER, DISPATCH_FLAGS,
                DISPATCH_METHOD, DISPATCH_PROPERTYGET, DISPATCH_PROPERTYPUT, DISPPARAMS, EXCEPINFO,
                SAFEARRAYBOUND,
            },
            Ole::{
                SafeArrayCreate, SafeArrayGetElement, SafeArrayGetLBound, SafeArrayGetUBound,
                SafeArrayPutElement, DISPID_PROPERTYPUT,
            },
            Variant::{
                VARENUM, VARIANT, VARIANT_0_0_0, VT_ARRAY, VT_BOOL, VT_BSTR, VT_DISPATCH, VT_EMPTY,
                VT_ERROR, VT_I2, VT_I4, VT_NULL, VT_R4, VT_R8, VT_VARIANT,
            },
        },
    },
};

pub type ComResult<T> = Result<T, String>;

/// `VT_ARRAY | VT_VARIANT`, the type of a multi-cell `Range.Value2`
const VT_VARIANT_ARRAY: VARENUM = VARENUM(VT_ARRAY.0 | VT_VARIANT.0);

// -- VARIANT construction --

fn variant_of(vt: VARENUM, fill: impl FnOnce(&mut VARIANT_0_0_0)) -> VARIANT {
    let mut v = VARIANT::default();
    // SAFETY: a default VARIANT is VT_EMPTY; the tag and its payload are
    // written together before the value is handed out.
    unsafe {
        let inner = &mut *v.Anonymous.Anonymous;
        ptr::write(&mut inner.vt, vt);
        fill(&mut inner.Anonymous);
    }
    v
}

pub fn variant_empty() -> VARIANT {
    VARIANT::default()
}

/// An omitted optional argument
pub fn variant_missing() -> VARIANT {
    variant_of(VT_ERROR, |u| u.scode = DISP_E_PARAMNOTFOUND.0)
}

pub fn variant_bool(val: bool) -> VARIANT {
    variant_of(VT_BOOL, |u| u.boolVal = VARIANT_BOOL(if val { -1 } else { 0 }))
}

pub fn variant_f64(val: f64) -> VARIANT {
    variant_of(VT_R8, |u| u.dblVal = val)
}

pub fn variant_i32(val: i32) -> VARIANT {
    variant_of(VT_I4, |u| u.lVal = val)
}

pub fn variant_str(val: &str) -> VARIANT {
    let bstr = BSTR::from(val);
    variant_of(VT_BSTR, |u| u.bstrVal = std::mem::ManuallyDrop::new(bstr))
}

/// A 1-based two-dimensional array of VARIANTs, rows first
pub fn variant_grid(rows: &[Vec<VARIANT>]) -> ComResult<VARIANT> {
    let height = u32::try_from(rows.len()).map_err(|_| "too many rows".to_string())?;
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let width = u32::try_from(width).map_err(|_| "too many columns".to_string())?;
    let bounds = [
        SAFEARRAYBOUND {
            cElements: height,
            lLbound: 1,
        },
        SAFEARRAYBOUND {
            cElements: width,
            lLbound: 1,
        },
    ];

    // SAFETY: the array is created with the bounds above and every index
    // written stays inside them.
    unsafe {
        let psa = SafeArrayCreate(VT_VARIANT, 2, bounds.as_ptr());
        if psa.is_null() {
            return Err("SafeArrayCreate failed".to_string());
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let index = [r as i32 + 1, c as i32 + 1];
                SafeArrayPutElement(psa, index.as_ptr(), value as *const VARIANT as *const c_void)
                    .map_err(|e| format!("SafeArrayPutElement failed: {e}"))?;
            }
        }
        Ok(variant_of(VT_VARIANT_ARRAY, |u| u.parray = psa))
    }
}

// -- VARIANT inspection --

pub fn variant_vt(v: &VARIANT) -> VARENUM {
    unsafe { v.Anonymous.Anonymous.vt }
}

pub fn variant_is_empty(v: &VARIANT) -> bool {
    let vt = variant_vt(v);
    vt == VT_EMPTY || vt == VT_NULL
}

pub fn variant_get_bool(v: &VARIANT) -> Option<bool> {
    (variant_vt(v) == VT_BOOL).then(|| unsafe { v.Anonymous.Anonymous.Anonymous.boolVal.0 != 0 })
}

/// Any numeric VARIANT as an f64
pub fn variant_get_f64(v: &VARIANT) -> Option<f64> {
    let vt = variant_vt(v);
    unsafe {
        let value = &v.Anonymous.Anonymous.Anonymous;
        match vt {
            VT_R8 => Some(value.dblVal),
            VT_R4 => Some(f64::from(value.fltVal)),
            VT_I4 => Some(f64::from(value.lVal)),
            VT_I2 => Some(f64::from(value.iVal)),
            _ => None,
        }
    }
}

pub fn variant_get_string(v: &VARIANT) -> Option<String> {
    (variant_vt(v) == VT_BSTR).then(|| unsafe { v.Anonymous.Anonymous.Anonymous.bstrVal.to_string() })
}

/// The SCODE of a `VT_ERROR` (Excel's `CVErr` values)
pub fn variant_get_error(v: &VARIANT) -> Option<i32> {
    (variant_vt(v) == VT_ERROR).then(|| unsafe { v.Anonymous.Anonymous.Anonymous.scode })
}

fn variant_get_dispatch(v: &VARIANT) -> Option<IDispatch> {
    if variant_vt(v) != VT_DISPATCH {
        return None;
    }
    let dispatch: &Option<IDispatch> = unsafe { &v.Anonymous.Anonymous.Anonymous.pdispVal };
    dispatch.clone()
}

/// Rows of a two-dimensional VARIANT array, or `None` for a scalar
pub fn variant_get_grid(v: &VARIANT) -> ComResult<Option<Vec<Vec<VARIANT>>>> {
    if variant_vt(v) != VT_VARIANT_ARRAY {
        return Ok(None);
    }

    // SAFETY: the tag says `parray` holds a SAFEARRAY of VARIANTs; indices
    // come from its own bounds.
    unsafe {
        let psa = v.Anonymous.Anonymous.Anonymous.parray;
        let bound = |dim: u32| -> ComResult<(i32, i32)> {
            let lower = SafeArrayGetLBound(psa, dim).map_err(|e| format!("SafeArrayGetLBound: {e}"))?;
            let upper = SafeArrayGetUBound(psa, dim).map_err(|e| format!("SafeArrayGetUBound: {e}"))?;
            Ok((lower, upper))
        };
        let (first_row, last_row) = bound(1)?;
        let (first_col, last_col) = bound(2)?;

        let mut rows = Vec::new();
        for r in first_row..=last_row {
            let mut row = Vec::new();
            for c in first_col..=last_col {
                let index = [r, c];
                let mut element = VARIANT::default();
                SafeArrayGetElement(psa, index.as_ptr(), &mut element as *mut VARIANT as *mut c_void)
                    .map_err(|e| format!("SafeArrayGetElement({r}, {c}): {e}"))?;
                row.push(element);
            }
            rows.push(row);
        }
        Ok(Some(rows))
    }
}

// -- DispatchObject --

/// An automation object such as a workbook, a worksheet or a range
#[derive(Clone)]
pub struct DispatchObject {
    inner: IDispatch,
}

impl DispatchObject {
    /// Instantiate a COM server by ProgID, e.g. `Excel.Application`
    pub fn create(progid: &str) -> ComResult<Self> {
        unsafe {
            let clsid = CLSIDFromProgID(&HSTRING::from(progid))
                .map_err(|e| format!("CLSIDFromProgID('{progid}') failed: {e}"))?;
            let inner: IDispatch = CoCreateInstance(&clsid, None, CLSCTX_LOCAL_SERVER)
                .map_err(|e| format!("CoCreateInstance('{progid}') failed: {e}"))?;
            Ok(Self { inner })
        }
    }

    fn dispid(&self, name: &str) -> ComResult<i32> {
        let wide: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
        let names = [PCWSTR(wide.as_ptr())];
        let mut dispid = 0i32;
        unsafe {
            self.inner
                .GetIDsOfNames(&GUID::zeroed(), names.as_ptr(), 1, GetSystemDefaultLCID(), &mut dispid)
                .map_err(|e| format!("Unknown member '{name}': {e}"))?;
        }
        Ok(dispid)
    }

    /// One `Invoke`; `args` are in call order
    fn invoke(&self, name: &str, flags: DISPATCH_FLAGS, args: &[VARIANT]) -> ComResult<VARIANT> {
        let dispid = self.dispid(name)?;
        let is_put = flags == DISPATCH_PROPERTYPUT;

        // DISPPARAMS lists positional arguments last to first
        let mut rgvarg: Vec<VARIANT> = args.iter().rev().cloned().collect();
        let mut named = [DISPID_PROPERTYPUT];
        let params = DISPPARAMS {
            rgvarg: if rgvarg.is_empty() {
                ptr::null_mut()
            } else {
                rgvarg.as_mut_ptr()
            },
            rgdispidNamedArgs: if is_put {
                named.as_mut_ptr()
            } else {
                ptr::null_mut()
            },
            cArgs: rgvarg.len() as u32,
            cNamedArgs: u32::from(is_put),
        };

        let mut result = VARIANT::default();
        let mut except = EXCEPINFO::default();
        unsafe {
            self.inner
                .Invoke(
                    dispid,
                    &GUID::zeroed(),
                    GetSystemDefaultLCID(),
                    flags,
                    &params,
                    Some(&mut result),
                    Some(&mut except),
                    None,
                )
                .map_err(|e| invoke_error(&e, &except, name))?;
        }
        Ok(result)
    }

    /// `obj.Name`
    pub fn get(&self, name: &str) -> ComResult<VARIANT> {
        self.invoke(name, DISPATCH_PROPERTYGET, &[])
    }

    /// `obj.Name(args...)` as a property read
    pub fn get_with(&self, name: &str, args: &[VARIANT]) -> ComResult<VARIANT> {
        self.invoke(name, DISPATCH_PROPERTYGET, args)
    }

    /// `obj.Name = value`
    pub fn put(&self, name: &str, value: VARIANT) -> ComResult<()> {
        self.invoke(name, DISPATCH_PROPERTYPUT, &[value]).map(|_| ())
    }

    /// `obj.Name(args...)` as a method call
    pub fn call(&self, name: &str, args: &[VARIANT]) -> ComResult<VARIANT> {
        self.invoke(name, DISPATCH_METHOD, args)
    }

    /// A property holding another object, e.g. `app.Workbooks`
    pub fn child(&self, name: &str) -> ComResult<DispatchObject> {
        into_object(&self.get(name)?, name)
    }

    /// An indexed property holding an object, e.g. `ws.Range("A1")`
    pub fn child_with(&self, name: &str, args: &[VARIANT]) -> ComResult<DispatchObject> {
        into_object(&self.get_with(name, args)?, name)
    }

    /// A method returning an object, e.g. `Workbooks.Add()`
    pub fn call_child(&self, name: &str, args: &[VARIANT]) -> ComResult<DispatchObject> {
        into_object(&self.call(name, args)?, name)
    }

    pub fn get_string(&self, name: &str) -> ComResult<String> {
        let value = self.get(name)?;
        Ok(variant_get_string(&value).unwrap_or_default())
    }

    pub fn get_i32(&self, name: &str) -> ComResult<i32> {
        let value = self.get(name)?;
        variant_get_f64(&value)
            .map(|n| n as i32)
            .ok_or_else(|| format!("'{name}' is not a number"))
    }
}

fn into_object(value: &VARIANT, member: &str) -> ComResult<DispatchObject> {
    match variant_get_dispatch(value) {
        Some(inner) => Ok(DispatchObject { inner }),
        None if variant_is_empty(value) => Err(format!("'{member}' returned nothing")),
        None => Err(format!(
            "'{member}' returned VT={} instead of an object",
            variant_vt(value).0
        )),
    }
}

/// Application exceptions keep Excel's description. Other failures carry
/// the raw HRESULT, which the client treats as write noise.
fn invoke_error(err: &windows::core::Error, except: &EXCEPINFO, member: &str) -> String {
    if err.code() == DISP_E_EXCEPTION {
        let description = if except.bstrDescription.is_empty() {
            "(no description)".to_string()
        } else {
            except.bstrDescription.to_string()
        };
        format!("{description} ('{member}')")
    } else {
        format!(
            "'{member}' failed: Exception from HRESULT: 0x{:08X}",
            err.code().0 as u32
        )
    }
}
