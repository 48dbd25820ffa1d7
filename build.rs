use std::cmp::Ordering;
use std::env;
use std::process::Command;

// One candidate backend and the CPU flag that enables it
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    cfg_flag: &'static str,
    arch: &'static [&'static str],
    // rustc target features the backend's intrinsics need inlined
    requires: &'static [&'static str],
    detected: bool,
    enabled: bool,
    nightly_only: bool,
}

impl CpuFeature {
    // Widest register first
    fn priority(&self) -> usize {
        match self.name {
            "avx512f" => 0,
            "avx2" => 1,
            "sse4_1" => 2,
            "neon" => 3,
            _ => usize::MAX,
        }
    }

    // Every backend that owns a resolution table in `src/simd/resolve.rs`
    fn features() -> Vec<CpuFeature> {
        const X86: &[&str] = &["x86", "x86_64"];

        vec![
            CpuFeature {
                name: "sse4_1",
                cfg_flag: "sse",
                arch: X86,
                requires: &["sse4.1"],
                detected: false,
                enabled: false,
                nightly_only: false,
            },
            CpuFeature {
                name: "avx512f",
                cfg_flag: "avx512",
                arch: X86,
                requires: &["avx512f", "avx2", "avx"],
                detected: false,
                enabled: false,
                nightly_only: true,
            },
            CpuFeature {
                name: "avx2",
                cfg_flag: "avx2",
                arch: X86,
                requires: &["avx2", "avx"],
                detected: false,
                enabled: false,
                nightly_only: false,
            },
            CpuFeature {
                name: "neon",
                cfg_flag: "neon",
                arch: &["aarch64"],
                requires: &["neon"],
                detected: false,
                enabled: false,
                nightly_only: false,
            },
        ]
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Per-OS source of CPU flags
trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

struct LinuxDetector;
impl CpuFeatureDetector for LinuxDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") else {
            return;
        };

        let contents = cpuinfo.to_lowercase();
        for feature in features.iter_mut() {
            feature.detected = match feature.name {
                // aarch64 kernels report Advanced SIMD as "asimd"
                "neon" => contents.contains("asimd") || contents.contains(" neon"),
                name => contents.contains(name),
            };
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

struct MacOSDetector;
impl CpuFeatureDetector for MacOSDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let Ok(output) = Command::new("sysctl").args(["-a"]).output() else {
            return;
        };

        let contents = String::from_utf8_lossy(&output.stdout).to_lowercase();

        for feature in features.iter_mut() {
            match feature.name {
                "avx512f" => feature.detected = contents.contains("hw.optional.avx512f: 1"),
                "avx2" => feature.detected = contents.contains("hw.optional.avx2_0: 1"),
                "sse4_1" => feature.detected = contents.contains("hw.optional.sse4_1: 1"),
                "neon" => feature.detected = contents.contains("hw.optional.neon: 1"),
                _ => {}
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

// Other hosts detect nothing; the backend still follows the enabled target features
struct PlatformDetector;
impl PlatformDetector {
    fn cpu_features_detectors() -> Vec<Box<dyn CpuFeatureDetector>> {
        vec![Box::new(LinuxDetector), Box::new(MacOSDetector)]
    }

    fn compiler_channel() -> String {
        let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
        let output = Command::new(rustc).args(["--version", "--verbose"]).output();

        match output {
            Ok(output) if String::from_utf8_lossy(&output.stdout).contains("nightly") => {
                "nightly".to_string()
            }
            _ => "stable".to_string(),
        }
    }

    // Marks the features the build host advertises
    fn detect_cpu_features(features: &mut [CpuFeature]) {
        if let Some(detector) = Self::cpu_features_detectors()
            .into_iter()
            .find(|detector| detector.is_applicable())
        {
            detector.detect_features(features);
        }
    }

    // Widest backend whose intrinsics the compiled target features can inline
    fn backend(features: &mut [CpuFeature], target_arch: &str, nightly: bool) -> &'static str {
        features.sort();

        let usable: Vec<&CpuFeature> = features
            .iter()
            .filter(|cpu_feature| cpu_feature.arch.contains(&target_arch))
            .filter(|cpu_feature| nightly || !cpu_feature.nightly_only)
            .collect();

        let chosen = usable.iter().find(|cpu_feature| cpu_feature.enabled);
        if let Some(wider) = usable.iter().find(|cpu_feature| cpu_feature.detected) {
            if chosen.map_or(true, |chosen| wider.priority() < chosen.priority()) {
                println!(
                    "cargo:warning=host supports {} but the target features do not enable it; \
                     build with RUSTFLAGS=\"-C target-cpu=native\" to use it",
                    wider.name
                );
            }
        }

        chosen.map_or("fallback", |cpu_feature| cpu_feature.cfg_flag)
    }

    fn apply(cfg_flag: &str, fma: bool) {
        println!("applying: {cfg_flag} (fma: {fma})");

        println!("cargo:rustc-cfg={cfg_flag}");
        if fma {
            println!("cargo:rustc-cfg=fma");
        }

        println!("cargo::rustc-check-cfg=cfg(avx512)");
        println!("cargo::rustc-check-cfg=cfg(avx2)");
        println!("cargo::rustc-check-cfg=cfg(sse)");
        println!("cargo::rustc-check-cfg=cfg(neon)");
        println!("cargo::rustc-check-cfg=cfg(fallback)");
        println!("cargo::rustc-check-cfg=cfg(fma)");
    }
}

// Explicit backend selection, validated against the enabled target features
fn backend_override(features: &[CpuFeature], target_arch: &str, nightly: bool) -> Option<&'static str> {
    let requested = env::var("LANEFOLD_BACKEND").ok()?;
    let requested = requested.trim().to_lowercase();
    if requested == "fallback" {
        return Some("fallback");
    }

    let accepted = features.iter().find(|cpu_feature| {
        cpu_feature.cfg_flag == requested
            && cpu_feature.arch.contains(&target_arch)
            && cpu_feature.enabled
            && (nightly || !cpu_feature.nightly_only)
    });
    if accepted.is_none() {
        println!("cargo:warning=ignoring LANEFOLD_BACKEND={requested}: not enabled for target {target_arch}");
    }
    accepted.map(|cpu_feature| cpu_feature.cfg_flag)
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=LANEFOLD_BACKEND");
    println!("cargo:rerun-if-env-changed=LANEFOLD_FMA");

    // avx512 intrinsics are still gated behind nightly features
    let rustc_channel = PlatformDetector::compiler_channel();
    println!("cargo:rustc-cfg=rustc_channel=\"{rustc_channel}\"");
    println!("cargo::rustc-check-cfg=cfg(rustc_channel, values(\"nightly\", \"stable\"))");

    let nightly_build = rustc_channel == "nightly";

    let mut features = CpuFeature::features();

    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();
    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let target_features = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();
    let enabled = |name: &str| target_features.split(',').any(|feature| feature == name);

    for feature in features.iter_mut() {
        feature.enabled = feature.requires.iter().all(|name| enabled(name));
    }

    // Host flags only feed the target-cpu hint; cross builds skip them
    if host == target {
        PlatformDetector::detect_cpu_features(&mut features);
    }

    let backend = backend_override(&features, &target_arch, nightly_build)
        .unwrap_or_else(|| PlatformDetector::backend(&mut features, &target_arch, nightly_build));

    // NEON always carries a fused multiply-add
    let fma_available = enabled("fma") || backend == "neon";
    let fma = match env::var("LANEFOLD_FMA").ok().as_deref() {
        Some("0") => false,
        Some("1") if !fma_available => {
            println!("cargo:warning=ignoring LANEFOLD_FMA=1: fma is not an enabled target feature");
            false
        }
        _ => fma_available,
    };

    PlatformDetector::apply(backend, fma);
}
