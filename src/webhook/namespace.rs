//! Namespaces the webhook never mutates

/// Namespace readable by all users, including unauthenticated ones
pub const KUBE_PUBLIC_NAMESPACE: &str = "kube-public";

/// Namespace for objects created by the Kubernetes system
pub const KUBE_SYSTEM_NAMESPACE: &str = "kube-system";

/// Whether `namespace` is owned by Kubernetes itself
///
/// Objects in these namespaces are admitted unchanged without consulting any
/// decision function. Cluster-scoped objects have no namespace and are not
/// protected.
pub fn is_protected(namespace: Option<&str>) -> bool {
    matches!(
        namespace,
        Some(KUBE_PUBLIC_NAMESPACE) | Some(KUBE_SYSTEM_NAMESPACE)
    )
}
