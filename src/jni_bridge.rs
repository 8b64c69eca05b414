//! JNI exports for `com.example.audiorecorder.AudioSineWaveGen`
//!
//! The Kotlin object owns one `EngineHandle`, held as a boxed pointer in a
//! `long` field. All calls for a handle must come from one thread at a time
//! (the UI thread in practice); the engine itself is not `Sync`.
//!
//! Errors never unwind across the boundary: they are logged and rethrown as
//! `java.lang.IllegalStateException`.

use std::ffi::c_void;
use std::sync::OnceLock;

use anyhow::{anyhow, Context};
use jni::objects::{GlobalRef, JClass, JObject, JString};
use jni::sys::{jfloat, jint, jlong, jstring, JNI_VERSION_1_6};
use jni::{JNIEnv, JavaVM};

use crate::config::AppConfig;
use crate::engine::{platform_backend, EngineHandle};
use crate::probe::probe_configured_tone;
use crate::error::StreamError;

const EXCEPTION_CLASS: &str = "java/lang/IllegalStateException";

/// Application context handed to `ndk_context`; kept alive for the process
static ANDROID_CONTEXT: OnceLock<GlobalRef> = OnceLock::new();

/// JNI_OnLoad is called when the native library is loaded by Android
#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: JavaVM, _reserved: *mut c_void) -> jint {
    crate::init_logging();
    tracing::info!("JNI_OnLoad called");
    JNI_VERSION_1_6
}

/// Register the application context with `ndk_context` for Oboe
///
/// Only the first call has an effect.
fn init_android_context(env: &mut JNIEnv, context: &JObject) -> Result<(), StreamError> {
    if ANDROID_CONTEXT.get().is_some() {
        return Ok(());
    }

    let jni_err = |e: jni::errors::Error| StreamError::JniInitFailed {
        reason: e.to_string(),
    };
    let vm = env.get_java_vm().map_err(jni_err)?;
    let context_ref = env.new_global_ref(context).map_err(jni_err)?;

    let global = ANDROID_CONTEXT.get_or_init(|| {
        // SAFETY: the VM pointer is valid for the life of the process and the
        // context is pinned by a global reference that is never released
        unsafe {
            ndk_context::initialize_android_context(
                vm.get_java_vm_pointer() as *mut c_void,
                context_ref.as_obj().as_raw() as *mut c_void,
            );
        }
        context_ref
    });

    tracing::info!(
        "Android context initialized: {:?}",
        global.as_obj().as_raw()
    );
    Ok(())
}

/// Run `f` against the engine behind `handle`, throwing on failure
fn with_engine<T: Default>(
    env: &mut JNIEnv,
    handle: jlong,
    context: &str,
    f: impl FnOnce(&mut EngineHandle) -> anyhow::Result<T>,
) -> T {
    if handle == 0 {
        throw(env, &anyhow!("{}: engine handle is null", context));
        return T::default();
    }

    // SAFETY: non-zero handles come from `nativeCreate` and stay valid until
    // `nativeDestroy`; the Kotlin side serializes calls per handle
    let engine = unsafe { &mut *(handle as *mut EngineHandle) };
    match f(engine).with_context(|| context.to_string()) {
        Ok(value) => value,
        Err(err) => {
            throw(env, &err);
            T::default()
        }
    }
}

fn throw(env: &mut JNIEnv, err: &anyhow::Error) {
    tracing::error!("{:#}", err);
    if let Err(e) = env.throw_new(EXCEPTION_CLASS, format!("{:#}", err)) {
        log::error!("Failed to throw Java exception: {}", e);
    }
}

/// Create an engine from a JSON `AppConfig` (empty string = defaults)
///
/// Returns 0 and throws if the config is invalid.
#[no_mangle]
pub extern "system" fn Java_com_example_audiorecorder_AudioSineWaveGen_nativeCreate<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    context: JObject<'local>,
    config_json: JString<'local>,
) -> jlong {
    let result = (|| -> anyhow::Result<jlong> {
        init_android_context(&mut env, &context)?;

        let json: String = env
            .get_string(&config_json)
            .context("reading config string")?
            .into();
        let config = if json.trim().is_empty() {
            AppConfig::default()
        } else {
            AppConfig::from_json_str(&json).context("parsing config")?
        };

        let engine = EngineHandle::new(config)?;
        Ok(Box::into_raw(Box::new(engine)) as jlong)
    })();

    match result {
        Ok(handle) => handle,
        Err(err) => {
            throw(&mut env, &err.context("nativeCreate"));
            0
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_com_example_audiorecorder_AudioSineWaveGen_nativeStart<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
) {
    with_engine(&mut env, handle, "nativeStart", |engine| {
        engine.start().map_err(Into::into)
    })
}

#[no_mangle]
pub extern "system" fn Java_com_example_audiorecorder_AudioSineWaveGen_nativePause<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
) {
    with_engine(&mut env, handle, "nativePause", |engine| {
        engine.pause().map_err(Into::into)
    })
}

#[no_mangle]
pub extern "system" fn Java_com_example_audiorecorder_AudioSineWaveGen_nativeStop<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
) {
    with_engine(&mut env, handle, "nativeStop", |engine| {
        engine.stop().map_err(Into::into)
    })
}

#[no_mangle]
pub extern "system" fn Java_com_example_audiorecorder_AudioSineWaveGen_nativeSetFrequency<
    'local,
>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
    frequency_hz: jfloat,
) {
    with_engine(&mut env, handle, "nativeSetFrequency", |engine| {
        engine.set_frequency(frequency_hz).map_err(Into::into)
    })
}

#[no_mangle]
pub extern "system" fn Java_com_example_audiorecorder_AudioSineWaveGen_nativeSetGain<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
    gain: jfloat,
) {
    with_engine(&mut env, handle, "nativeSetGain", |engine| {
        engine.set_amplitude(gain).map_err(Into::into)
    })
}

/// Render one probe buffer and return its report as JSON
#[no_mangle]
pub extern "system" fn Java_com_example_audiorecorder_AudioSineWaveGen_nativeProbe<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
) -> jstring {
    let json = with_engine(&mut env, handle, "nativeProbe", |engine| {
        let report = engine.probe()?;
        tracing::debug!("output device: {:?}", engine.describe_device());
        Ok(Some(serde_json::to_string(&report)?))
    });

    let Some(json) = json else {
        return std::ptr::null_mut();
    };
    match env.new_string(json) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            throw(&mut env, &anyhow!("nativeProbe: {}", e));
            std::ptr::null_mut()
        }
    }
}

/// Release the engine; stops playback first. A 0 handle is ignored.
#[no_mangle]
pub extern "system" fn Java_com_example_audiorecorder_AudioSineWaveGen_nativeDestroy<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
) {
    if handle == 0 {
        return;
    }
    // SAFETY: handle came from `nativeCreate` and is not used again by Kotlin
    drop(unsafe { Box::from_raw(handle as *mut EngineHandle) });
    tracing::debug!("engine destroyed");
}

/// Static `AudioSineWaveGen.audioProbe()` behind the "Stream" button
///
/// Logs the output device (once `nativeCreate` has registered the context)
/// and a report of the default tone.
#[no_mangle]
pub extern "system" fn Java_com_example_audiorecorder_AudioSineWaveGen_audioProbe<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
) {
    if ANDROID_CONTEXT.get().is_some() {
        match platform_backend().describe_device() {
            Ok(device) => tracing::info!("output device: {:?}", device),
            Err(err) => tracing::warn!("output device query failed: {}", err),
        }
    } else {
        tracing::debug!("audioProbe: no Android context yet, skipping device query");
    }

    match probe_configured_tone(&AppConfig::default()) {
        Ok(report) => tracing::info!("audioProbe: {:?}", report),
        Err(err) => throw(&mut env, &anyhow!(err).context("audioProbe")),
    }
}
