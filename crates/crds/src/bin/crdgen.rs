//! Prints the Observation CRD manifest as YAML.

use kube::CustomResourceExt;

fn main() {
    match serde_yaml::to_string(&crds::Observation::crd()) {
        Ok(manifest) => print!("{}", manifest),
        Err(e) => {
            eprintln!("Failed to render Observation CRD: {}", e);
            std::process::exit(1);
        }
    }
}
