use tokio::sync::mpsc;

/// Точка доставки сообщений, которой владеет подписчик.
///
/// Реестр хранит только клон дескриптора для маршрутизации и никогда не
/// закрывает его. Доставка всегда неблокирующая: одна попытка отправки,
/// при неудаче сообщение для этой точки отбрасывается.
pub trait Endpoint: Clone {
    /// Тип доставляемого сообщения.
    type Message;

    /// Одна неблокирующая попытка доставки.
    ///
    /// Возвращает `false`, если сообщение отброшено (буфер заполнен или
    /// принимающая сторона уже закрыта).
    fn try_deliver(&self, message: Self::Message) -> bool;

    /// Сравнение по идентичности: два дескриптора одного и того же буфера
    /// считаются одной точкой доставки.
    fn same_endpoint(&self, other: &Self) -> bool;

    /// Пустой (nil) дескриптор. Подписка и отписка с ним ничего не делают.
    fn is_nil(&self) -> bool {
        false
    }
}

impl<M> Endpoint for mpsc::Sender<M> {
    type Message = M;

    fn try_deliver(&self, message: M) -> bool {
        self.try_send(message).is_ok()
    }

    fn same_endpoint(&self, other: &Self) -> bool {
        self.same_channel(other)
    }
}

impl<M> Endpoint for mpsc::UnboundedSender<M> {
    type Message = M;

    fn try_deliver(&self, message: M) -> bool {
        self.send(message).is_ok()
    }

    fn same_endpoint(&self, other: &Self) -> bool {
        self.same_channel(other)
    }
}

/// `None` играет роль nil-дескриптора.
impl<E: Endpoint> Endpoint for Option<E> {
    type Message = E::Message;

    fn try_deliver(&self, message: E::Message) -> bool {
        match self {
            Some(endpoint) => endpoint.try_deliver(message),
            None => false,
        }
    }

    fn same_endpoint(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_endpoint(b),
            _ => false,
        }
    }

    fn is_nil(&self) -> bool {
        match self {
            Some(endpoint) => endpoint.is_nil(),
            None => true,
        }
    }
}
